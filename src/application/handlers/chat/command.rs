//! Chat request/response types and request body validation.

use serde::Serialize;
use serde_json::Value;

use crate::domain::conversation::ConversationId;
use crate::domain::foundation::ValidationError;

use super::gateway::ChatGatewayError;

/// Command to relay one chat message to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendChatMessageCommand {
    /// Non-empty message text.
    pub message: String,
    /// Conversation to continue; `None` starts a new one.
    pub conversation_id: Option<ConversationId>,
}

impl SendChatMessageCommand {
    /// Parses a raw request body: `{"message": string, "thread_id"?: string}`.
    pub fn from_json_body(body: &[u8]) -> Result<Self, ChatGatewayError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| ChatGatewayError::InvalidJson)?;
        Ok(Self::from_json_value(&value)?)
    }

    /// Validates an already decoded body.
    ///
    /// A body that is not an object has no `message`. `null` and `""` count
    /// as absent for both fields.
    pub fn from_json_value(value: &Value) -> Result<Self, ValidationError> {
        let field = |name: &str| {
            value
                .as_object()
                .and_then(|fields| fields.get(name))
                .filter(|v| !v.is_null())
        };

        let message = match field("message") {
            Some(Value::String(text)) if !text.is_empty() => text.clone(),
            Some(Value::String(_)) | None => {
                return Err(ValidationError::missing_field("message"))
            }
            Some(_) => return Err(ValidationError::not_a_string("message")),
        };

        let conversation_id = match field("thread_id") {
            Some(Value::String(id)) if !id.is_empty() => Some(ConversationId::new(id.clone())),
            Some(Value::String(_)) | None => None,
            Some(_) => return Err(ValidationError::not_a_string("thread_id")),
        };

        Ok(Self {
            message,
            conversation_id,
        })
    }
}

/// Successful chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub thread_id: ConversationId,
    pub run_status: Option<String>,
    pub output: Option<String>,
}

/// Error envelope: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
