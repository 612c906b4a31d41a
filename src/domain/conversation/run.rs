//! Outcome of an agent run.

use serde::{Deserialize, Serialize};

/// Terminal state of one agent run against a conversation.
///
/// `status` is passed through verbatim; the gateway attaches no meaning to
/// `"failed"` or any other value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RunResult {
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            id: None,
            status: Some(status.into()),
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
