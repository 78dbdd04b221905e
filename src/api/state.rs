use std::sync::Arc;

use crate::{
    config::Config,
    services::{FeedbackSink, Recommender},
};

/// Shared application state
///
/// Everything here is built once at startup and only read by handlers;
/// the feedback log on disk is the only thing requests mutate.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub feedback: Arc<FeedbackSink>,
    pub settings: Arc<RecommendSettings>,
}

/// Request defaults and link template for the recommend endpoint
#[derive(Debug, Clone)]
pub struct RecommendSettings {
    pub watch_search_url: String,
    pub default_user_id: String,
    pub default_count: usize,
}

impl From<&Config> for RecommendSettings {
    fn from(config: &Config) -> Self {
        Self {
            watch_search_url: config.watch_search_url.clone(),
            default_user_id: config.default_user_id.clone(),
            default_count: config.default_recommendation_count,
        }
    }
}

impl AppState {
    pub fn new(recommender: Recommender, feedback: FeedbackSink, settings: RecommendSettings) -> Self {
        Self {
            recommender: Arc::new(recommender),
            feedback: Arc::new(feedback),
            settings: Arc::new(settings),
        }
    }

    /// Loads the catalog and ranking backend from the configured paths
    pub fn from_config(config: &Config) -> Self {
        let recommender = Recommender::load(&config.movies_path, &config.model_path);
        tracing::info!(
            catalog_size = recommender.catalog().len(),
            model_loaded = recommender.model_loaded(),
            "Recommender ready"
        );

        Self::new(
            recommender,
            FeedbackSink::new(&config.feedback_log_path),
            RecommendSettings::from(config),
        )
    }
}
