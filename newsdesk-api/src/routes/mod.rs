//! API route definitions

mod articles;
mod cron;
mod health;
mod posts;
mod prompts;

use axum::Router;
use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(cron::routes())
        .merge(articles::routes())
        .merge(posts::routes())
        .merge(prompts::routes())
        .merge(health::routes())
}
