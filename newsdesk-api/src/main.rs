//! Newsdesk API Server
//!
//! HTTP server exposing the pipeline's cron stages, manual actions and
//! dashboard queries.

mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use newsdesk_ai::OpenAiClient;
use newsdesk_services::{ArticleStore, ClassifyService, IngestService, InstagramService};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment-driven server configuration
pub struct ApiConfig {
    /// Whether production-only protections are active (APP_ENV=production)
    pub production: bool,
    /// Shared secret for cron endpoints
    pub cron_secret: Option<String>,
    /// Base URL the workflow runner calls back into
    pub base_url: String,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArticleStore>,
    pub ai: Arc<OpenAiClient>,
    pub ingest: Arc<IngestService>,
    pub classify: Arc<ClassifyService>,
    pub instagram: Arc<InstagramService>,
    pub config: Arc<ApiConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,newsdesk_api=debug")),
        )
        .init();

    info!("Starting Newsdesk API");

    let production = std::env::var("APP_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let cron_secret = std::env::var("CRON_SECRET").ok();
    if cron_secret.is_none() {
        info!("No CRON_SECRET set - cron auth disabled");
    }

    let port: u16 = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let base_url =
        std::env::var("BASE_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));

    // Initialize storage
    let db_path =
        std::env::var("NEWSDESK_DB_PATH").unwrap_or_else(|_| "data/newsdesk.db".to_string());
    info!("Initializing article store at: {}", db_path);
    let store = Arc::new(ArticleStore::new(&db_path)?);

    // Initialize the LLM client (reads OPENAI_API_KEY from env)
    let ai = Arc::new(OpenAiClient::new()?);

    // Initialize pipeline services
    let ingest = Arc::new(IngestService::new(Arc::clone(&store)));
    let classify = Arc::new(ClassifyService::new(Arc::clone(&ai), Arc::clone(&store)));
    let instagram = Arc::new(InstagramService::new(Arc::clone(&ai), Arc::clone(&store)));

    let state = AppState {
        store,
        ai,
        ingest,
        classify,
        instagram,
        config: Arc::new(ApiConfig {
            production,
            cron_secret,
            base_url,
        }),
    };

    // Configure CORS for the dashboard frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Build router
    let app = Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
