//! Domain layer containing the conversation model and reply selection.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors)
//! - `conversation` - Conversation identifiers, thread messages, runs and
//!   the assistant reply extraction policy

pub mod conversation;
pub mod foundation;
