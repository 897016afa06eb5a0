//! Article endpoints: dashboard listing and manual pipeline actions

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use newsdesk_ai::{default_category_prompt, normalize_prompt_category};
use newsdesk_core::{ArticleStatus, NewsdeskError};
use serde::Deserialize;
use tracing::error;

use crate::AppState;

/// Query parameters for listing articles
#[derive(Debug, Deserialize)]
pub struct ArticlesQuery {
    /// Optional status filter (pending/classified/generated/posted)
    pub status: Option<String>,
    /// Maximum number of results
    pub limit: Option<usize>,
}

/// Request body for single-article classification
#[derive(Debug, Deserialize)]
pub struct ClassifySingleRequest {
    pub id: i64,
}

/// Request body for summary generation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummaryRequest {
    pub id: i64,
    pub user_id: Option<String>,
}

/// Create article routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list_articles))
        .route("/classify-single", post(classify_single))
        .route("/generate-summary", post(generate_summary))
        .route("/generate-instagram-content", get(generate_instagram_content))
        .route("/fetch-rss-articles", get(fetch_rss_articles))
}

/// GET /api/articles - dashboard listing with optional status filter
async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ArticlesQuery>,
) -> impl IntoResponse {
    let status = match params.status.as_deref() {
        None => None,
        Some(raw) => match ArticleStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "success": false,
                        "error": format!("Invalid status: {}", raw),
                    })),
                )
                    .into_response();
            }
        },
    };

    let limit = params.limit.unwrap_or(50);

    match state.store.list_articles(status, limit) {
        Ok(articles) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "count": articles.len(),
                "articles": articles,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list articles: {}", e);
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

/// POST /api/classify-single - enhanced classification of one article
async fn classify_single(
    State(state): State<AppState>,
    Json(request): Json<ClassifySingleRequest>,
) -> impl IntoResponse {
    match state.classify.classify_single(request.id).await {
        Ok(classification) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "classification": classification,
            })),
        )
            .into_response(),
        Err(NewsdeskError::NotFound(message)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": message,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Single classification failed: {}", e);
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

/// POST /api/generate-summary - prose summary using the stored category prompt
async fn generate_summary(
    State(state): State<AppState>,
    Json(request): Json<GenerateSummaryRequest>,
) -> impl IntoResponse {
    let article = match state.store.get_article(request.id) {
        Ok(Some(article)) => article,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "success": false,
                    "error": format!("Article {} not found", request.id),
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!("Failed to load article {}: {}", request.id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": e.to_string(),
                })),
            )
                .into_response();
        }
    };

    let category = normalize_prompt_category(
        article.category.map(|c| c.as_str()).unwrap_or("general"),
    );
    let user_id = request.user_id.as_deref().unwrap_or("default");

    // Stored template wins; built-in prompt otherwise
    let system_prompt = match state.store.get_prompt(user_id, category) {
        Ok(Some(stored)) => stored,
        Ok(None) => default_category_prompt(category).to_string(),
        Err(e) => {
            error!("Failed to load prompt for {}: {}", category, e);
            default_category_prompt(category).to_string()
        }
    };

    let body = article
        .content
        .as_deref()
        .or(article.excerpt.as_deref())
        .unwrap_or_default();

    match state
        .ai
        .summarize_with_prompt(&system_prompt, &article.title, body)
        .await
    {
        Ok(summary) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "category": category,
                "summary": summary,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Summary generation failed for {}: {}", request.id, e);
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

/// GET /api/generate-instagram-content - manual generation batch
async fn generate_instagram_content(State(state): State<AppState>) -> impl IntoResponse {
    match state.instagram.run_manual().await {
        Ok(results) if results.is_empty() => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": false,
                "message": "No classified articles ready for Instagram content. \
                            Run classification first or all articles already have posts.",
            })),
        )
            .into_response(),
        Ok(results) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "processed": results.len(),
                "results": results,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Manual Instagram generation failed: {}", e);
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

/// GET /api/fetch-rss-articles - preview fresh articles without persisting
async fn fetch_rss_articles(State(state): State<AppState>) -> impl IntoResponse {
    let articles = state.ingest.preview(10).await;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "articles": articles,
        })),
    )
        .into_response()
}
