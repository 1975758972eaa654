use scraper::Html;

/// Href of the true detail page, if this release-group page is recognized.
///
/// Year-index links land on an intermediate page listing one row per release.
/// Only pages whose summary table leads with a `Domestic` column carry the
/// link we follow; anything else yields `None` and the movie is dropped.
pub fn parse(html: &Html) -> Option<String> {
    let header = html
        .select(selector!("table.mojo-table th.a-size-medium"))
        .next()?;
    if header.text().collect::<String>().trim() != "Domestic" {
        return None;
    }
    let href = html
        .select(selector!("table.mojo-table a.a-link-normal"))
        .next()?
        .attr("href")?;
    Some(href.to_owned())
}
