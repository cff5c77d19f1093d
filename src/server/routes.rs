//! Router definition for the relay API.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::server::{cors, handlers, state::AppState};

/// Build the relay router: upload, download, and a health probe.
pub fn create_router(state: &AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/upload", post(handlers::upload_handler))
        .route("/download/:code", get(handlers::download_handler))
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(axum::middleware::from_fn(cors::apply_cors))
}
