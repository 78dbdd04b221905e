use axum::{
    body::Bytes,
    extract::{Query, State},
    Extension, Json,
};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{FeedbackAck, HealthResponse, RecommendQuery, RecommendationResponse, RecommendedMovie},
};

use super::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_loaded: state.recommender.model_loaded(),
    })
}

/// Recommends up to `n` movies for a user
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let user_id = query
        .user_id
        .unwrap_or_else(|| state.settings.default_user_id.clone());
    let n = query.n.unwrap_or(state.settings.default_count);

    if n == 0 {
        return Err(AppError::InvalidInput("n must be at least 1".to_string()));
    }

    let selection = state.recommender.select(&user_id, n);

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        requested = n,
        returned = selection.entries.len(),
        strategy = ?selection.strategy,
        "Served recommendations"
    );

    let recommendations = selection
        .entries
        .into_iter()
        .map(|entry| RecommendedMovie::new(entry, &state.settings.watch_search_url))
        .collect();

    Ok(Json(RecommendationResponse {
        user_id,
        recommendations,
    }))
}

/// Appends an arbitrary JSON payload to the feedback log
///
/// The body is parsed as JSON whatever its `Content-Type` says.
pub async fn feedback(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> AppResult<Json<FeedbackAck>> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidInput(format!("feedback body is not valid JSON: {}", e)))?;

    state.feedback.record(&payload).await?;

    tracing::info!(request_id = %request_id, "Feedback logged");

    Ok(Json(FeedbackAck::logged()))
}
