//! API Route Configuration

use axum::{http::Uri, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::logging_middleware;
use crate::models::errors::AppError;

fn wallet_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/risk/:address", get(handlers::get_risk))
        .route("/report/:address", get(handlers::get_report))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(uri.path())
}

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = wallet_routes().route("/stats", get(handlers::get_stats));

    // GET routes answer HEAD as well
    Router::new()
        .nest("/v1", api_v1)
        .merge(wallet_routes())
        .fallback(not_found)
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}
