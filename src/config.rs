use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CSV catalog with `movieId,title,genres` columns
    #[serde(default = "default_movies_path")]
    pub movies_path: PathBuf,

    /// Pretrained ranking model; absent or unreadable means content-similarity mode
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Append-only JSONL feedback log
    #[serde(default = "default_feedback_log_path")]
    pub feedback_log_path: PathBuf,

    /// Search URL prefix the cleaned title is appended to
    #[serde(default = "default_watch_search_url")]
    pub watch_search_url: String,

    #[serde(default = "default_user_id")]
    pub default_user_id: String,

    #[serde(default = "default_recommendation_count")]
    pub default_recommendation_count: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_movies_path() -> PathBuf {
    PathBuf::from("model/movies.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model/model.json")
}

fn default_feedback_log_path() -> PathBuf {
    PathBuf::from("model/feedback_log.jsonl")
}

fn default_watch_search_url() -> String {
    "https://www.netflix.com/search?q=".to_string()
}

fn default_user_id() -> String {
    "jane".to_string()
}

fn default_recommendation_count() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            movies_path: default_movies_path(),
            model_path: default_model_path(),
            feedback_log_path: default_feedback_log_path(),
            watch_search_url: default_watch_search_url(),
            default_user_id: default_user_id(),
            default_recommendation_count: default_recommendation_count(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
