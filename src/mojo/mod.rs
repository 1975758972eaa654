pub mod analysis;
pub mod normalize;
pub mod parser;
pub mod schema;

pub const BASE_URL: &str = "https://www.boxofficemojo.com";

/// Worldwide box-office index page for one calendar year.
pub fn year_index_url(year: u16) -> String {
    format!("{BASE_URL}/year/world/{year}/")
}

#[cfg(test)]
mod tests {
    use super::year_index_url;

    #[test]
    fn year_index_url_is_site_absolute() {
        assert_eq!(
            year_index_url(2023),
            "https://www.boxofficemojo.com/year/world/2023/"
        );
    }
}
