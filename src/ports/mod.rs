//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the gateway and the outside world. Adapters implement these ports.
//!
//! - `AgentService` - the remote conversational-agent service
//! - `CredentialProvider` - bearer tokens for calling that service

mod agent_service;
mod credential_provider;

pub use agent_service::{AgentService, AgentServiceError};
pub use credential_provider::{AccessToken, CredentialError, CredentialProvider};
