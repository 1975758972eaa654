use thiserror::Error;

/// Sentinel rating used to keep grouping well-defined for unrated releases.
pub const NOT_RATED: &str = "NotRated";

#[derive(Debug, Error)]
#[error("not a currency amount: {0:?}")]
pub struct CurrencyParseError(pub String);

/// Strips the dollar sign and thousands separators and parses the rest as a
/// number. `"$1,234,567.50"` becomes `1234567.5`.
pub fn normalize_currency(raw: &str) -> Result<f64, CurrencyParseError> {
    regex!(r"[$,]")
        .replace_all(raw.trim(), "")
        .parse()
        .map_err(|_| CurrencyParseError(raw.to_owned()))
}

/// Splits a newline-delimited blob into trimmed, non-empty segments,
/// preserving order.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn default_rating(raw: Option<&str>) -> &str {
    raw.unwrap_or(NOT_RATED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_round_trips() {
        for (raw, expected) in [
            ("$1", 1.0),
            ("$100", 100.0),
            ("$54,165,435", 54_165_435.0),
            ("$1,234,567.50", 1_234_567.50),
            ("  $2,000 ", 2_000.0),
            ("350", 350.0),
        ] {
            assert_eq!(normalize_currency(raw).unwrap(), expected, "{raw}");
        }
    }

    #[test]
    fn currency_rejects_non_numeric_residue() {
        for raw in ["", "N/A", "$-", "12 theaters", "$1,2,3x"] {
            let err = normalize_currency(raw).unwrap_err();
            assert_eq!(err.0, raw);
        }
    }

    #[test]
    fn split_list_drops_blank_segments() {
        assert_eq!(split_list("Action\n\nDrama\n"), ["Action", "Drama"]);
        assert_eq!(split_list("  Action  \n \t \nDrama"), ["Action", "Drama"]);
        assert!(split_list("\n \n").is_empty());
    }

    #[test]
    fn split_list_is_idempotent_on_clean_input() {
        let once = split_list("Action\n\nDrama\n");
        let again = split_list(&once.join("\n"));
        assert_eq!(once, again);
    }

    #[test]
    fn rating_defaults_to_sentinel() {
        assert_eq!(default_rating(None), "NotRated");
        assert_eq!(default_rating(Some("PG-13")), "PG-13");
    }
}
