//! Agent Gateway - HTTP front door for a hosted conversational agent.
//!
//! Relays a chat message into a conversation on a remote agent service,
//! runs the agent, and returns the latest assistant reply. The same core
//! gateway is served standalone or as a function host custom handler.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
