use serde::{Deserialize, Serialize};

pub mod movie;

pub use movie::{CatalogEntry, CatalogRow};

/// Query parameters accepted by the recommend endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub n: Option<usize>,
}

/// A catalog entry decorated with a link to watch it
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedMovie {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub watch_url: String,
}

impl RecommendedMovie {
    pub fn new(entry: &CatalogEntry, search_url: &str) -> Self {
        Self {
            watch_url: entry.watch_url(search_url),
            entry: entry.clone(),
        }
    }
}

/// Response body of the recommend endpoint
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_id: String,
    pub recommendations: Vec<RecommendedMovie>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

/// Acknowledgement returned after a feedback payload is appended
#[derive(Debug, Serialize)]
pub struct FeedbackAck {
    pub status: &'static str,
}

impl FeedbackAck {
    pub fn logged() -> Self {
        Self { status: "logged" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::split_genres;

    #[test]
    fn test_recommended_movie_flattens_entry() {
        let entry = CatalogEntry::new(2, "Jumanji (1995)", split_genres("Adventure|Children|Fantasy"));
        let movie = RecommendedMovie::new(&entry, "https://www.netflix.com/search?q=");
        let json = serde_json::to_value(&movie).unwrap();

        assert_eq!(json["movieId"], 2);
        assert_eq!(json["title"], "Jumanji (1995)");
        assert_eq!(json["genres"], "Adventure|Children|Fantasy");
        assert_eq!(json["watch_url"], "https://www.netflix.com/search?q=Jumanji");
    }

    #[test]
    fn test_feedback_ack_serialization() {
        let json = serde_json::to_string(&FeedbackAck::logged()).unwrap();
        assert_eq!(json, r#"{"status":"logged"}"#);
    }
}
