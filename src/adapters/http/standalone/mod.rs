//! Standalone HTTP server: `/healthz` and `/chat` on an axum router.

mod handlers;
mod routes;

pub use handlers::StandaloneState;
pub use routes::standalone_router;
