use getset::Getters;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use typed_builder::TypedBuilder;

/// Movie title as printed in the detail page heading.
#[derive(
    Clone, PartialEq, Eq, Debug, derive_more::From, derive_more::Display, Serialize, Deserialize,
)]
pub struct MovieTitle(String);

impl From<&str> for MovieTitle {
    fn from(v: &str) -> Self {
        MovieTitle(v.to_owned())
    }
}

/// A currency amount exactly as scraped, symbol and separators included
/// (`$1,234,567`). Numeric interpretation is deferred to aggregation time.
#[derive(
    Clone, PartialEq, Eq, Debug, derive_more::From, derive_more::Display, Serialize, Deserialize,
)]
pub struct RawMoney(String);

impl RawMoney {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawMoney {
    fn from(v: &str) -> Self {
        RawMoney(v.to_owned())
    }
}

/// Genre names in page order. The record row must stay flat, so the list is
/// written as a single comma-joined cell and split on commas when read back.
#[derive(Clone, PartialEq, Eq, Debug, Default, derive_more::From, derive_more::Into)]
pub struct GenreList(Vec<String>);

impl GenreList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_cell(&self) -> String {
        self.0.join(",")
    }
}

impl Serialize for GenreList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_cell())
    }
}

impl<'de> Deserialize<'de> for GenreList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cell = String::deserialize(deserializer)?;
        Ok(GenreList(
            cell.split(',')
                .map(str::trim)
                .filter(|genre| !genre.is_empty())
                .map(str::to_owned)
                .collect(),
        ))
    }
}

/// The unified record every layout variant is mapped onto. Serialization
/// order and names define the interchange CSV columns.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct MovieRecord {
    #[serde(rename = "Title")]
    title: MovieTitle,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Domestic_BO")]
    domestic_bo: RawMoney,
    #[serde(rename = "International_BO")]
    international_bo: RawMoney,
    #[serde(rename = "Worldwide_BO")]
    worldwide_bo: RawMoney,
    #[serde(rename = "Distributor")]
    #[builder(default)]
    distributor: Option<String>,
    #[serde(rename = "Opening_amount")]
    #[builder(default)]
    opening_amount: Option<RawMoney>,
    #[serde(rename = "Budget")]
    #[builder(default)]
    budget: Option<RawMoney>,
    #[serde(rename = "Release_date")]
    #[builder(default)]
    release_date: Option<String>,
    #[serde(rename = "Mpaa_rating")]
    #[builder(default)]
    mpaa_rating: Option<String>,
    #[serde(rename = "Running_time")]
    #[builder(default)]
    running_time: Option<String>,
    #[serde(rename = "Genres")]
    #[builder(default)]
    genres: GenreList,
    #[serde(rename = "In_release")]
    #[builder(default)]
    in_release: Option<String>,
    #[serde(rename = "Widest_release")]
    #[builder(default)]
    widest_release: Option<String>,
}

impl MovieRecord {
    /// Copy of the record with the three gross cells replaced; the ranked
    /// by-movie report writes them back in numeric form.
    pub fn with_money_cells(
        &self,
        domestic: RawMoney,
        international: RawMoney,
        worldwide: RawMoney,
    ) -> Self {
        Self {
            domestic_bo: domestic,
            international_bo: international,
            worldwide_bo: worldwide,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_list_cell_round_trips() {
        let genres = GenreList::from(vec!["Action".to_owned(), "Sci-Fi".to_owned()]);
        assert_eq!(genres.to_cell(), "Action,Sci-Fi");
        let json = serde_json::to_string(&genres).unwrap();
        assert_eq!(json, "\"Action,Sci-Fi\"");
        let back: GenreList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, genres);
    }

    #[test]
    fn empty_genre_cell_reads_as_empty_list() {
        let back: GenreList = serde_json::from_str("\"\"").unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn record_serializes_with_interchange_columns() {
        let record = MovieRecord::builder()
            .title("Example".into())
            .description(Some("A film.".to_owned()))
            .domestic_bo("$100".into())
            .international_bo("$200".into())
            .worldwide_bo("$300".into())
            .mpaa_rating(Some("PG".to_owned()))
            .genres(vec!["Drama".to_owned()].into())
            .build();

        let mut buffer = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buffer);
            writer.serialize(&record).unwrap();
            writer.flush().unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Title,Description,Domestic_BO,International_BO,Worldwide_BO,\
             Distributor,Opening_amount,Budget,Release_date,Mpaa_rating,\
             Running_time,Genres,In_release,Widest_release"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Example,A film.,$100,$200,$300,,,,,PG,,Drama,,"
        );
    }

    #[test]
    fn record_round_trips_through_csv() {
        let record = MovieRecord::builder()
            .title("Example".into())
            .description(None)
            .domestic_bo("$1".into())
            .international_bo("$2".into())
            .worldwide_bo("$3".into())
            .distributor(Some("Acme Pictures".to_owned()))
            .genres(vec!["Action".to_owned(), "Drama".to_owned()].into())
            .build();

        let mut buffer = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buffer);
            writer.serialize(&record).unwrap();
            writer.flush().unwrap();
        }
        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let back: MovieRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(back, record);
    }
}
