//! HTTP routes for the function host.

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{invoke, FunctionHostState};

/// Creates the router the function host forwards invocations to.
pub fn function_host_router(function_name: &str, state: FunctionHostState) -> Router {
    Router::new()
        .route(&format!("/{}", function_name), post(invoke))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::agents::InMemoryAgentService;
    use crate::adapters::http::CorsPolicy;
    use crate::application::ChatGateway;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(service: &InMemoryAgentService) -> Router {
        let gateway = ChatGateway::new(Arc::new(service.clone()), "asst_test");
        function_host_router("chat", FunctionHostState::new(gateway, CorsPolicy::permissive()))
    }

    fn invocation(method: &str, body: Value) -> Request<Body> {
        let envelope = json!({
            "Data": {"req": {"Method": method, "Headers": {}, "Body": body}},
            "Metadata": {}
        });
        Request::post("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(envelope.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn relays_chat_through_envelope() {
        let service = InMemoryAgentService::new()
            .with_conversation_ids(["conv-1"])
            .with_reply("Hi there");

        let response = router(&service)
            .oneshot(invocation("POST", json!(r#"{"message":"Hello"}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = json_body(response).await;
        let res = &envelope["Outputs"]["res"];
        assert_eq!(res["statusCode"], 200);
        assert_eq!(res["headers"]["Content-Type"], "application/json");
        assert_eq!(res["headers"]["Access-Control-Allow-Origin"], "*");
        let body: Value = serde_json::from_str(res["body"].as_str().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"thread_id": "conv-1", "run_status": "completed", "output": "Hi there"})
        );
        assert_eq!(envelope["ReturnValue"], Value::Null);
    }

    #[tokio::test]
    async fn preflight_inside_envelope() {
        let service = InMemoryAgentService::new();
        let response = router(&service)
            .oneshot(invocation("OPTIONS", Value::Null))
            .await
            .unwrap();

        let envelope = json_body(response).await;
        let res = &envelope["Outputs"]["res"];
        assert_eq!(res["statusCode"], 204);
        assert!(res.get("body").is_none());
        assert_eq!(res["headers"]["Access-Control-Allow-Methods"], "POST,OPTIONS");
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_message_inside_envelope() {
        let service = InMemoryAgentService::new();
        let response = router(&service)
            .oneshot(invocation("POST", json!(r#"{"thread_id":"t"}"#)))
            .await
            .unwrap();

        let envelope = json_body(response).await;
        let res = &envelope["Outputs"]["res"];
        assert_eq!(res["statusCode"], 400);
        assert_eq!(res["body"], r#"{"error":"Field 'message' is required"}"#);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn undecodable_envelope_is_bad_request() {
        let response = router(&InMemoryAgentService::new())
            .oneshot(Request::post("/chat").body(Body::from("nope")).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid invocation payload"));
    }

    #[tokio::test]
    async fn custom_function_name() {
        let gateway = ChatGateway::new(Arc::new(InMemoryAgentService::new()), "asst_test");
        let app = function_host_router(
            "relay",
            FunctionHostState::new(gateway, CorsPolicy::permissive()),
        );

        let response = app
            .oneshot(Request::post("/chat").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
