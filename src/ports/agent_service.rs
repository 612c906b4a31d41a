//! Agent Service Port - Interface to the remote conversational-agent service.
//!
//! The remote service owns conversations (threads), their messages and the
//! runs that make the agent respond. The gateway drives exactly four
//! operations against it per request, in a fixed order.
//!
//! # Example
//!
//! ```ignore
//! let conversation = service.create_conversation().await?;
//! service.append_message(&conversation, &MessageRole::user(), "Hello").await?;
//! let run = service.create_and_process_run(&conversation, "asst_123").await?;
//! let history = service.list_messages(&conversation).await?;
//! ```

use async_trait::async_trait;

use super::credential_provider::CredentialError;
use crate::domain::conversation::{ConversationId, MessageList, MessageRole, RunResult};

/// Port for the remote agent service.
///
/// Implementations hold a long-lived client and must be safe to share
/// between concurrent requests without locking.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Creates a new, empty conversation and returns its identifier.
    async fn create_conversation(&self) -> Result<ConversationId, AgentServiceError>;

    /// Appends a message authored by `role` to the conversation.
    async fn append_message(
        &self,
        conversation: &ConversationId,
        role: &MessageRole,
        content: &str,
    ) -> Result<(), AgentServiceError>;

    /// Starts a run of `agent_id` on the conversation and waits until the
    /// service reports a terminal status.
    async fn create_and_process_run(
        &self,
        conversation: &ConversationId,
        agent_id: &str,
    ) -> Result<RunResult, AgentServiceError>;

    /// Returns the conversation's message history, oldest first.
    async fn list_messages(
        &self,
        conversation: &ConversationId,
    ) -> Result<MessageList, AgentServiceError>;
}

/// Agent service errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AgentServiceError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("agent service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// The response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// No bearer token could be obtained.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
}

impl AgentServiceError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_describes_code_and_body() {
        let err = AgentServiceError::status(404, "No thread found with id 'thread_x'.");
        assert_eq!(
            err.to_string(),
            "agent service returned 404: No thread found with id 'thread_x'."
        );
    }

    #[test]
    fn credential_errors_convert() {
        let err: AgentServiceError = CredentialError::unavailable("no identity endpoint").into();
        assert!(matches!(err, AgentServiceError::Credential(_)));
        assert!(err.to_string().contains("no identity endpoint"));
    }
}
