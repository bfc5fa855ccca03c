//! Router configuration for the HTTP server.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Room for multipart boundaries and the small form fields around the file.
const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    let api_v1 = Router::new().route("/analyze", post(handlers::analyze));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/upload", post(handlers::upload))
        .route("/output/{filename}", get(handlers::serve_plot))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
