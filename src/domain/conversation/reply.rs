//! Assistant reply extraction policy.
//!
//! Two sources are consulted in a fixed order:
//!
//! 1. [`ReplySource::TextView`] - the text-only view, newest entry first;
//!    the first assistant entry with non-empty text wins.
//! 2. [`ReplySource::RawMessages`] - the raw history, newest message first,
//!    content blocks in their original order. Each block is read with
//!    [`BLOCK_READERS`] and the first non-empty text wins.
//!
//! Finding nothing is not an error: the agent simply produced no text.

use super::message::{ContentBlock, MessageList, TextBody, TextMessage, ThreadMessage};

/// Where a reply was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    TextView,
    RawMessages,
}

impl ReplySource {
    /// Sources in the order they are tried.
    pub const ORDER: [ReplySource; 2] = [ReplySource::TextView, ReplySource::RawMessages];

    /// Looks for the latest assistant text in this source only.
    pub fn select<'a>(&self, messages: &'a MessageList) -> Option<&'a str> {
        match self {
            ReplySource::TextView => latest_from_text_view(messages.text_messages.as_deref()?),
            ReplySource::RawMessages => latest_from_raw(&messages.data),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::TextView => "text_view",
            ReplySource::RawMessages => "raw_messages",
        }
    }
}

/// Reply text together with the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReply {
    pub text: String,
    pub source: ReplySource,
}

type BlockReader = fn(&ContentBlock) -> Option<&str>;

/// Per-block text readers, in priority order.
pub const BLOCK_READERS: [BlockReader; 3] = [nested_text_value, plain_text, generic_value];

fn nested_text_value(block: &ContentBlock) -> Option<&str> {
    block.text.as_ref().and_then(TextBody::structured_value)
}

fn plain_text(block: &ContentBlock) -> Option<&str> {
    block.text.as_ref().and_then(TextBody::plain)
}

fn generic_value(block: &ContentBlock) -> Option<&str> {
    block.generic_value()
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

fn view_entry_text(entry: &TextMessage) -> Option<&str> {
    let text = entry.text.as_ref()?;
    text.structured_value()
        .and_then(non_empty)
        .or_else(|| text.plain().and_then(non_empty))
}

fn latest_from_text_view(view: &[TextMessage]) -> Option<&str> {
    view.iter()
        .rev()
        .filter(|entry| entry.role.as_ref().is_some_and(|role| role.is_assistant()))
        .find_map(view_entry_text)
}

fn block_text(block: &ContentBlock) -> Option<&str> {
    BLOCK_READERS
        .iter()
        .find_map(|read| read(block).and_then(non_empty))
}

fn latest_from_raw(data: &[ThreadMessage]) -> Option<&str> {
    data.iter()
        .rev()
        .filter(|message| message.role.is_assistant())
        .find_map(|message| message.content.iter().find_map(block_text))
}

/// Runs every source in order and reports which one matched.
pub fn extract_reply(messages: &MessageList) -> Option<ExtractedReply> {
    ReplySource::ORDER.iter().find_map(|source| {
        source.select(messages).map(|text| ExtractedReply {
            text: text.to_string(),
            source: *source,
        })
    })
}

/// Text of the most recent assistant reply, if any.
pub fn extract_assistant_reply(messages: &MessageList) -> Option<String> {
    extract_reply(messages).map(|reply| reply.text)
}
