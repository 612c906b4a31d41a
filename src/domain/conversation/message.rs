//! Thread message model as reported by the remote agent service.
//!
//! The shapes here are deliberately lenient: the remote service owns them,
//! so unknown fields are ignored and optional parts default to empty.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role tag of a message author.
///
/// Kept as a string because the remote service owns the vocabulary; only
/// `"user"` and `"assistant"` have meaning to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageRole(String);

impl MessageRole {
    pub const USER: &'static str = "user";
    pub const ASSISTANT: &'static str = "assistant";

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// The caller's turn.
    pub fn user() -> Self {
        Self::new(Self::USER)
    }

    /// The agent's turn.
    pub fn assistant() -> Self {
        Self::new(Self::ASSISTANT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_assistant(&self) -> bool {
        self.0 == Self::ASSISTANT
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text payload of a message or content block.
///
/// The remote service reports text either as a bare string or as an object
/// carrying the string in `value` (plus annotations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextBody {
    Plain(String),
    Structured(StructuredText),
    Other(serde_json::Value),
}

impl TextBody {
    /// Structured text with the given value.
    pub fn structured(value: impl Into<String>) -> Self {
        TextBody::Structured(StructuredText {
            value: Some(value.into()),
            annotations: Vec::new(),
        })
    }

    /// Nested `value` of a structured body.
    pub fn structured_value(&self) -> Option<&str> {
        match self {
            TextBody::Structured(text) => text.value.as_deref(),
            _ => None,
        }
    }

    /// The body itself when it is already a plain string.
    pub fn plain(&self) -> Option<&str> {
        match self {
            TextBody::Plain(text) => Some(text),
            _ => None,
        }
    }
}

/// Structured text object: `{"value": "...", "annotations": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredText {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<serde_json::Value>,
}

/// One block of message content (text, image reference, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl ContentBlock {
    /// A `text` block carrying structured text.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: Some("text".to_string()),
            text: Some(TextBody::structured(value)),
            value: None,
        }
    }

    /// Generic `value` field, when it holds a string.
    pub fn generic_value(&self) -> Option<&str> {
        self.value.as_ref().and_then(serde_json::Value::as_str)
    }
}

/// A single turn in a remote conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl ThreadMessage {
    pub fn new(role: MessageRole, content: Vec<ContentBlock>) -> Self {
        Self {
            id: None,
            role,
            content,
        }
    }

    /// A single-block text message.
    pub fn text(role: MessageRole, text: impl Into<String>) -> Self {
        Self::new(role, vec![ContentBlock::text(text)])
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Entry of the text-only convenience view of a message history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<MessageRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBody>,
}

impl TextMessage {
    pub fn new(role: MessageRole, text: TextBody) -> Self {
        Self {
            role: Some(role),
            text: Some(text),
        }
    }
}

/// Message history of a conversation, oldest first.
///
/// `text_messages` is only present when the remote service supplies the
/// text-only view alongside the raw messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub data: Vec<ThreadMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_messages: Option<Vec<TextMessage>>,
}

impl MessageList {
    pub fn new(data: Vec<ThreadMessage>) -> Self {
        Self {
            data,
            text_messages: None,
        }
    }

    pub fn with_text_messages(mut self, text_messages: Vec<TextMessage>) -> Self {
        self.text_messages = Some(text_messages);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.text_messages.as_ref().map_or(true, Vec::is_empty)
    }
}
