//! Chat handler - the gateway's single use case.

mod command;
mod gateway;

pub use command::{ChatResponse, ErrorBody, SendChatMessageCommand};
pub use gateway::{ChatGateway, ChatGatewayError, ChatReply, ChatReplyBody};
