//! HTTP routes for the standalone server.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{chat, cors_headers, healthz, preflight, StandaloneState};

/// Creates the standalone router with all endpoints.
pub fn standalone_router(state: StandaloneState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/chat", post(chat).options(preflight))
        .layer(middleware::from_fn_with_state(state.clone(), cors_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
