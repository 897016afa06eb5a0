//! Instagram post endpoints for the dashboard

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use newsdesk_core::PostStatus;
use serde::Deserialize;
use tracing::error;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub status: String,
}

/// Create post routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/instagram-posts", get(list_posts))
        .route("/instagram-posts/{id}", patch(update_post))
}

/// GET /api/instagram-posts - dashboard listing
async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostsQuery>,
) -> impl IntoResponse {
    match state.store.list_posts(params.limit.unwrap_or(50)) {
        Ok(posts) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "count": posts.len(),
                "posts": posts,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list posts: {}", e);
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

/// PATCH /api/instagram-posts/{id} - dashboard status edit
async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> impl IntoResponse {
    let Some(status) = PostStatus::parse(&request.status) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": format!("Invalid status: {}", request.status),
            })),
        )
            .into_response();
    };

    match state.store.update_post_status(id, status) {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "id": id,
                "status": status,
            })),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": "Post not found",
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to update post {}: {}", id, e);
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
