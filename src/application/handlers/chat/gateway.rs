//! ChatGateway - relay a chat message to the agent and return its reply.

use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;

use crate::domain::conversation::{extract_reply, ConversationId, MessageRole};
use crate::domain::foundation::ValidationError;
use crate::ports::{AgentService, AgentServiceError};

use super::command::{ChatResponse, ErrorBody, SendChatMessageCommand};

/// Error type for chat requests.
#[derive(Debug, thiserror::Error)]
pub enum ChatGatewayError {
    /// Body is not valid JSON.
    #[error("Invalid JSON body")]
    InvalidJson,

    /// Body is JSON but fails validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Any failure reported by the agent service.
    #[error(transparent)]
    Agent(#[from] AgentServiceError),
}

impl ChatGatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatGatewayError::InvalidJson | ChatGatewayError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ChatGatewayError::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

/// JSON body of a chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChatReplyBody {
    Success(ChatResponse),
    Error(ErrorBody),
}

/// Transport-neutral reply: status code plus JSON body.
///
/// Hosting adapters render this into their native response type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub status: StatusCode,
    pub body: ChatReplyBody,
}

impl ChatReply {
    pub fn ok(response: ChatResponse) -> Self {
        Self {
            status: StatusCode::OK,
            body: ChatReplyBody::Success(response),
        }
    }

    pub fn error(err: &ChatGatewayError) -> Self {
        Self {
            status: err.status(),
            body: ChatReplyBody::Error(ErrorBody::new(err.to_string())),
        }
    }

    /// Renders the body as JSON text.
    pub fn body_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.body)
    }
}

/// Core chat gateway shared by every hosting adapter.
///
/// Holds the long-lived agent service client; cloning is cheap.
#[derive(Clone)]
pub struct ChatGateway {
    agents: Arc<dyn AgentService>,
    agent_id: String,
}

impl ChatGateway {
    pub fn new(agents: Arc<dyn AgentService>, agent_id: impl Into<String>) -> Self {
        Self {
            agents,
            agent_id: agent_id.into(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Handles a raw request body and never fails: every error becomes a
    /// reply with the matching status and an `{"error": ...}` body.
    pub async fn handle_body(&self, body: &[u8]) -> ChatReply {
        let outcome = match SendChatMessageCommand::from_json_body(body) {
            Ok(cmd) => self.handle(cmd).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(response) => ChatReply::ok(response),
            Err(err) => {
                if err.is_client_error() {
                    tracing::warn!("Rejected chat request: {}", err);
                } else {
                    tracing::error!("Agent call failed: {}", err);
                }
                ChatReply::error(&err)
            }
        }
    }

    /// Runs one chat turn: resolve conversation, post the message, run the
    /// agent to completion, then read back the latest assistant reply.
    ///
    /// A message posted before a failing run is not rolled back.
    pub async fn handle(
        &self,
        cmd: SendChatMessageCommand,
    ) -> Result<ChatResponse, ChatGatewayError> {
        let conversation = self.resolve_conversation(cmd.conversation_id).await?;

        self.agents
            .append_message(&conversation, &MessageRole::user(), &cmd.message)
            .await?;

        let run = self
            .agents
            .create_and_process_run(&conversation, &self.agent_id)
            .await?;
        tracing::info!(
            thread_id = %conversation,
            run_status = run.status().unwrap_or("unknown"),
            "Agent run finished"
        );

        let history = self.agents.list_messages(&conversation).await?;
        let output = match extract_reply(&history) {
            Some(reply) => {
                tracing::debug!(source = reply.source.as_str(), "Assistant reply found");
                Some(reply.text)
            }
            None => {
                tracing::debug!(thread_id = %conversation, "Run produced no assistant text");
                None
            }
        };

        Ok(ChatResponse {
            thread_id: conversation,
            run_status: run.status,
            output,
        })
    }

    /// Returns the caller's conversation unchanged, or creates a new one.
    async fn resolve_conversation(
        &self,
        requested: Option<ConversationId>,
    ) -> Result<ConversationId, AgentServiceError> {
        match requested {
            Some(id) => {
                tracing::debug!(thread_id = %id, "Continuing conversation");
                Ok(id)
            }
            None => {
                let id = self.agents.create_conversation().await?;
                tracing::debug!(thread_id = %id, "Created conversation");
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::agents::{InMemoryAgentService, RecordedCall};
    use serde_json::json;

    fn gateway(service: &InMemoryAgentService) -> ChatGateway {
        ChatGateway::new(Arc::new(service.clone()), "asst_test")
    }

    #[tokio::test]
    async fn new_conversation_scenario() {
        let service = InMemoryAgentService::new()
            .with_conversation_ids(["conv-1"])
            .with_run_status("completed")
            .with_reply("Hi there");

        let reply = gateway(&service).handle_body(br#"{"message":"Hello"}"#).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&reply.body).unwrap(),
            json!({"thread_id": "conv-1", "run_status": "completed", "output": "Hi there"})
        );
        assert_eq!(
            service.calls(),
            vec![
                RecordedCall::CreateConversation,
                RecordedCall::AppendMessage {
                    conversation: "conv-1".into(),
                    role: "user".into(),
                    content: "Hello".into(),
                },
                RecordedCall::CreateAndProcessRun {
                    conversation: "conv-1".into(),
                    agent_id: "asst_test".into(),
                },
                RecordedCall::ListMessages {
                    conversation: "conv-1".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn supplied_conversation_is_reused() {
        let service = InMemoryAgentService::new()
            .with_existing_conversation("thread_existing")
            .with_reply("Welcome back");
        let gateway = gateway(&service);

        let cmd = SendChatMessageCommand {
            message: "Again".into(),
            conversation_id: Some(ConversationId::new("thread_existing")),
        };
        let response = gateway.handle(cmd).await.unwrap();

        assert_eq!(response.thread_id.as_str(), "thread_existing");
        assert_eq!(response.output.as_deref(), Some("Welcome back"));
        assert!(!service.calls().contains(&RecordedCall::CreateConversation));
    }

    #[tokio::test]
    async fn fresh_conversations_get_distinct_ids() {
        let service = InMemoryAgentService::new().with_reply("ok");
        let gateway = gateway(&service);

        let first = gateway
            .handle(SendChatMessageCommand {
                message: "one".into(),
                conversation_id: None,
            })
            .await
            .unwrap();
        let second = gateway
            .handle(SendChatMessageCommand {
                message: "two".into(),
                conversation_id: None,
            })
            .await
            .unwrap();

        assert_ne!(first.thread_id, second.thread_id);
    }

    #[tokio::test]
    async fn failed_run_status_is_passed_through() {
        let service = InMemoryAgentService::new().with_run_status("failed");

        let response = gateway(&service)
            .handle(SendChatMessageCommand {
                message: "Hello".into(),
                conversation_id: None,
            })
            .await
            .unwrap();

        assert_eq!(response.run_status.as_deref(), Some("failed"));
        assert_eq!(response.output, None);
    }

    #[tokio::test]
    async fn absent_run_status_is_returned_as_null() {
        let service = InMemoryAgentService::new()
            .with_conversation_ids(["conv-1"])
            .without_run_status()
            .with_reply("Hi");

        let reply = gateway(&service).handle_body(br#"{"message":"Hello"}"#).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&reply.body).unwrap(),
            json!({"thread_id": "conv-1", "run_status": null, "output": "Hi"})
        );
        assert!(reply.body_json().unwrap().contains(r#""run_status":null"#));
    }

    #[tokio::test]
    async fn validation_errors_make_no_remote_calls() {
        let service = InMemoryAgentService::new();
        let gateway = gateway(&service);

        let reply = gateway.handle_body(br#"{"message":""}"#).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.body,
            ChatReplyBody::Error(ErrorBody::new("Field 'message' is required"))
        );

        let reply = gateway.handle_body(b"not json").await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body, ChatReplyBody::Error(ErrorBody::new("Invalid JSON body")));

        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn run_failure_becomes_internal_error_with_description() {
        let service = InMemoryAgentService::new().failing_run(AgentServiceError::status(
            500,
            "run exploded",
        ));

        let reply = gateway(&service).handle_body(br#"{"message":"Hello"}"#).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.body_json().unwrap(),
            r#"{"error":"agent service returned 500: run exploded"}"#
        );
        // The user message stays posted.
        assert!(service
            .messages("thread_1")
            .iter()
            .any(|m| m.role.as_str() == "user"));
    }

    #[tokio::test]
    async fn conversation_creation_failure_stops_the_flow() {
        let service = InMemoryAgentService::new()
            .failing_create(AgentServiceError::network("connection refused"));

        let reply = gateway(&service).handle_body(br#"{"message":"Hello"}"#).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(service.calls(), vec![RecordedCall::CreateConversation]);
    }
}
