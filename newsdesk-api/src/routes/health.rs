//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};

use crate::AppState;

/// Health check handler: healthy when the store answers
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.article_counts() {
        Ok(counts) => {
            let by_status: serde_json::Map<String, serde_json::Value> = counts
                .into_iter()
                .map(|(status, count)| (status, serde_json::json!(count)))
                .collect();

            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "healthy",
                    "articles": by_status,
                })),
            )
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "degraded",
                "error": e.to_string(),
            })),
        ),
    }
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
