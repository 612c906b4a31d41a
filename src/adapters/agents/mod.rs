//! Agent service adapters.
//!
//! - `RestAgentService` - the hosted agent REST API
//! - `InMemoryAgentService` - scripted fake for tests and local runs

mod in_memory;
mod rest_agent_service;

pub use in_memory::{InMemoryAgentService, RecordedCall};
pub use rest_agent_service::{RestAgentConfig, RestAgentService};
