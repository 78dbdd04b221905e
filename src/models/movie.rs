use serde::{Deserialize, Serialize, Serializer};

/// Separator between genre tags in the catalog source
pub const GENRE_SEPARATOR: &str = "|";

/// A recommendable movie loaded from the catalog
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntry {
    #[serde(rename = "movieId")]
    pub id: i64,
    pub title: String,
    /// Serialized as the pipe-delimited string clients expect
    #[serde(rename = "genres", serialize_with = "serialize_genre_tags")]
    pub genre_tags: Vec<String>,
    /// Title and genres joined, used for content similarity
    #[serde(skip)]
    pub text: String,
}

impl CatalogEntry {
    /// Creates an entry and derives its similarity text
    pub fn new(id: i64, title: impl Into<String>, genre_tags: Vec<String>) -> Self {
        let title = title.into();
        let text = format!("{} {}", title, join_genres(&genre_tags));
        Self {
            id,
            title,
            genre_tags,
            text,
        }
    }

    /// Title with any parenthesized suffix such as the release year removed
    pub fn search_title(&self) -> &str {
        self.title.split(" (").next().unwrap_or_default()
    }

    /// Builds a link to the external search page for this title
    pub fn watch_url(&self, search_url: &str) -> String {
        format!("{}{}", search_url, urlencoding::encode(self.search_title()))
    }
}

/// Raw row of the catalog CSV
#[derive(Debug, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
}

impl From<CatalogRow> for CatalogEntry {
    fn from(row: CatalogRow) -> Self {
        let genre_tags = row
            .genres
            .as_deref()
            .map(split_genres)
            .unwrap_or_default();
        CatalogEntry::new(row.movie_id, row.title.unwrap_or_default(), genre_tags)
    }
}

pub fn split_genres(genres: &str) -> Vec<String> {
    genres
        .split(GENRE_SEPARATOR)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_genres(tags: &[String]) -> String {
    tags.join(GENRE_SEPARATOR)
}

#[allow(clippy::ptr_arg)]
fn serialize_genre_tags<S>(tags: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&join_genres(tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_story() -> CatalogEntry {
        CatalogEntry::new(1, "Toy Story (1995)", split_genres("Animation|Children|Comedy"))
    }

    #[test]
    fn test_derived_text() {
        assert_eq!(toy_story().text, "Toy Story (1995) Animation|Children|Comedy");
    }

    #[test]
    fn test_serializes_original_column_names() {
        let json = serde_json::to_value(toy_story()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "movieId": 1,
                "title": "Toy Story (1995)",
                "genres": "Animation|Children|Comedy"
            })
        );
    }

    #[test]
    fn test_watch_url_strips_year() {
        let url = toy_story().watch_url("https://www.netflix.com/search?q=");
        assert_eq!(url, "https://www.netflix.com/search?q=Toy%20Story");
    }

    #[test]
    fn test_watch_url_keeps_title_without_suffix() {
        let entry = CatalogEntry::new(7, "Heat", vec![]);
        assert_eq!(entry.watch_url("https://example.com/?q="), "https://example.com/?q=Heat");
    }

    #[test]
    fn test_watch_url_escapes_punctuation() {
        let entry = CatalogEntry::new(11, "American President, The (1995)", vec![]);
        assert_eq!(
            entry.watch_url("https://www.netflix.com/search?q="),
            "https://www.netflix.com/search?q=American%20President%2C%20The"
        );
    }

    #[test]
    fn test_row_with_missing_fields() {
        let row = CatalogRow {
            movie_id: 3,
            title: None,
            genres: None,
        };
        let entry = CatalogEntry::from(row);
        assert_eq!(entry.title, "");
        assert!(entry.genre_tags.is_empty());
        assert_eq!(entry.text, " ");
    }
}
