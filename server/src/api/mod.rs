use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::snmp::CommandWalker;

pub mod error;
pub mod snmp;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub walker: Arc<CommandWalker>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            walker: Arc::new(CommandWalker::new(config.snmp)),
        }
    }
}

/// Build the main application router with all API routes.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health))
        // SNMP client discovery and connectivity test
        .route("/snmp", post(snmp::query))
        .fallback(not_found);

    Router::new()
        .nest("/api/v1", api_v1)
        .layer(cors)
        .with_state(state)
}

/// Simple health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> error::AppError {
    error::AppError::NotFound
}
