//! Stored prompt template endpoints
//!
//! Per-category system prompts used by summary generation, user-scoped and
//! upserted on (user_id, category). Missing rows fall back to the built-in
//! defaults.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use newsdesk_ai::{default_category_prompt, normalize_prompt_category};
use serde::Deserialize;
use tracing::error;

use crate::AppState;

/// User scope when the caller doesn't provide one
const DEFAULT_USER: &str = "default";

#[derive(Debug, Deserialize)]
pub struct PromptQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPromptRequest {
    pub system_prompt: String,
    pub user_id: Option<String>,
}

/// Create prompt routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/prompts/{category}", get(get_prompt).put(put_prompt))
}

/// GET /api/prompts/{category} - stored prompt or built-in default
async fn get_prompt(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<PromptQuery>,
) -> impl IntoResponse {
    let category = normalize_prompt_category(&category);
    let user_id = params.user_id.unwrap_or_else(|| DEFAULT_USER.to_string());

    match state.store.get_prompt(&user_id, category) {
        Ok(Some(system_prompt)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "category": category,
                "systemPrompt": system_prompt,
                "isDefault": false,
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "category": category,
                "systemPrompt": default_category_prompt(category),
                "isDefault": true,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to load prompt for {}: {}", category, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// PUT /api/prompts/{category} - upsert a stored prompt
async fn put_prompt(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(request): Json<UpsertPromptRequest>,
) -> impl IntoResponse {
    if request.system_prompt.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": "systemPrompt must not be empty",
            })),
        )
            .into_response();
    }

    let category = normalize_prompt_category(&category);
    let user_id = request.user_id.unwrap_or_else(|| DEFAULT_USER.to_string());

    match state
        .store
        .upsert_prompt(&user_id, category, &request.system_prompt)
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "category": category,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to save prompt for {}: {}", category, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
