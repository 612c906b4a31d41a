//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates the chat flow over the agent service port and
//! turns every outcome into a transport-neutral reply.

pub mod handlers;

pub use handlers::{
    ChatGateway, ChatGatewayError, ChatReply, ChatReplyBody, ChatResponse, ErrorBody,
    SendChatMessageCommand,
};
