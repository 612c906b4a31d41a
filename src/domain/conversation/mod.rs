//! Conversation model shared by the gateway and the agent service port.
//!
//! Conversations live entirely on the remote agent service. The gateway
//! only carries their identifiers, reads their message history after a run
//! and selects the reply to hand back to the caller.

mod ids;
mod message;
mod reply;
mod run;

pub use ids::ConversationId;
pub use message::{
    ContentBlock, MessageList, MessageRole, StructuredText, TextBody, TextMessage, ThreadMessage,
};
pub use reply::{extract_assistant_reply, extract_reply, ExtractedReply, ReplySource, BLOCK_READERS};
pub use run::RunResult;
