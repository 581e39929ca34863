//! Axum router — routes, CORS, and request tracing.

use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::analyze::analyze;
use crate::server::state::{AppState, SharedState};

/// Build and return the full router. Cross-origin requests are allowed
/// from any origin.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/analyze", post(analyze))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
