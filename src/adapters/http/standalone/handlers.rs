//! HTTP handlers for the standalone server.

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header::ORIGIN, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::adapters::http::cors::CorsPolicy;
use crate::application::{ChatGateway, ChatReply};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct StandaloneState {
    gateway: ChatGateway,
    cors: CorsPolicy,
}

impl StandaloneState {
    pub fn new(gateway: ChatGateway, cors: CorsPolicy) -> Self {
        Self { gateway, cors }
    }

    pub fn cors(&self) -> &CorsPolicy {
        &self.cors
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /healthz - Liveness check
pub async fn healthz() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

/// POST /chat - Relay a message to the agent
pub async fn chat(State(state): State<StandaloneState>, body: Bytes) -> Response {
    reply_response(state.gateway.handle_body(&body).await)
}

/// OPTIONS /chat - CORS preflight
pub async fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Adds CORS headers to every response, including errors from the router.
pub async fn cors_headers(
    State(state): State<StandaloneState>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(ORIGIN).cloned();
    let mut response = next.run(request).await;
    state.cors.apply(origin.as_ref(), response.headers_mut());
    response
}

fn reply_response(reply: ChatReply) -> Response {
    (reply.status, Json(reply.body)).into_response()
}
