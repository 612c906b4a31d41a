//! Remote agent service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Remote agent service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentsConfig {
    /// Project endpoint of the agent service
    pub endpoint: String,

    /// Agent that answers chat messages
    pub agent_id: String,

    /// `api-version` query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Delay between run status polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Scope requested for bearer tokens
    #[serde(default = "default_token_scope")]
    pub token_scope: String,
}

impl AgentsConfig {
    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate agent service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.endpoint.is_empty() {
            return Err(ValidationError::MissingRequired("AZURE_AI_PROJECT_ENDPOINT"));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ValidationError::InvalidAgentEndpoint);
        }
        if self.agent_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AZURE_AI_USER_AGENT_ID"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        Ok(())
    }
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_token_scope() -> String {
    "https://ai.azure.com/.default".to_string()
}
