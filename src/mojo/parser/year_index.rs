use scraper::Html;

/// Hrefs of every movie link on a year-index page, in document order. The
/// links sit in the left-aligned title cells; they lead to release-group
/// pages, not to the detail pages themselves.
pub fn parse(html: &Html) -> Vec<String> {
    html.select(selector!("td.a-text-left a.a-link-normal"))
        .filter_map(|anchor| anchor.attr("href"))
        .map(str::to_owned)
        .collect()
}
