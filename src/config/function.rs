//! Function host (custom handler) configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Settings for running behind the function host.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionConfig {
    /// Port assigned by the host; falls back to `server.port`
    pub port: Option<u16>,

    /// Function the host forwards chat invocations to
    #[serde(default = "default_function_name")]
    pub function_name: String,
}

impl FunctionConfig {
    /// Port to listen on, given the server fallback.
    pub fn port_or(&self, fallback: u16) -> u16 {
        self.port.unwrap_or(fallback)
    }

    /// Validate function host configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == Some(0) {
            return Err(ValidationError::InvalidPort);
        }
        if self.function_name.is_empty() || self.function_name.contains('/') {
            return Err(ValidationError::InvalidFunctionName);
        }
        Ok(())
    }
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            port: None,
            function_name: default_function_name(),
        }
    }
}

fn default_function_name() -> String {
    "chat".to_string()
}
