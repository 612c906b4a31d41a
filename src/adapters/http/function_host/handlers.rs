//! Invocation handler for the function host.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::cors::CorsPolicy;
use crate::application::{ChatGateway, ErrorBody};

use super::envelope::{HttpTriggerRequest, HttpTriggerResponse, InvocationRequest, InvocationResponse};

#[derive(Clone)]
pub struct FunctionHostState {
    gateway: ChatGateway,
    cors: CorsPolicy,
}

impl FunctionHostState {
    pub fn new(gateway: ChatGateway, cors: CorsPolicy) -> Self {
        Self { gateway, cors }
    }
}

/// POST /{function_name} - One HTTP trigger invocation
pub async fn invoke(State(state): State<FunctionHostState>, body: Bytes) -> Response {
    let invocation: InvocationRequest = match serde_json::from_slice(&body) {
        Ok(invocation) => invocation,
        Err(e) => {
            tracing::warn!("Undecodable invocation envelope: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(format!("Invalid invocation payload: {}", e))),
            )
                .into_response();
        }
    };

    let res = handle_trigger(&state, &invocation.data.req).await;
    let logs = vec![format!(
        "{} {} -> {}",
        invocation.data.req.method,
        invocation.data.req.url.as_deref().unwrap_or("chat"),
        res.status_code
    )];

    Json(InvocationResponse::new(res, logs)).into_response()
}

async fn handle_trigger(state: &FunctionHostState, req: &HttpTriggerRequest) -> HttpTriggerResponse {
    let origin = req.header("Origin").and_then(|o| HeaderValue::from_str(o).ok());
    let mut headers = state.cors.headers(origin.as_ref());

    if req.is_preflight() {
        return HttpTriggerResponse {
            status_code: StatusCode::NO_CONTENT.as_u16(),
            body: None,
            headers: header_strings(&headers),
        };
    }

    let reply = state.gateway.handle_body(&req.body_bytes()).await;
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    let body = match reply.body_json() {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to encode chat reply: {}", e);
            return HttpTriggerResponse {
                status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                body: Some(r#"{"error":"Failed to encode reply"}"#.to_string()),
                headers: header_strings(&headers),
            };
        }
    };

    HttpTriggerResponse {
        status_code: reply.status.as_u16(),
        body: Some(body),
        headers: header_strings(&headers),
    }
}

/// Output binding headers are a flat string map.
fn header_strings(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        flat.insert(canonical_name(name.as_str()), values.join(", "));
    }
    flat
}

/// `access-control-allow-origin` -> `Access-Control-Allow-Origin`
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalises_header_names() {
        assert_eq!(
            canonical_name("access-control-allow-origin"),
            "Access-Control-Allow-Origin"
        );
        assert_eq!(canonical_name("vary"), "Vary");
        assert_eq!(canonical_name("content-type"), "Content-Type");
    }

    #[test]
    fn flattens_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::VARY, HeaderValue::from_static("Origin"));
        headers.append(header::VARY, HeaderValue::from_static("Accept"));

        let flat = header_strings(&headers);
        assert_eq!(flat["Vary"], "Origin, Accept");
    }
}
