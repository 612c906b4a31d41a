//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AGENT_GATEWAY` prefix and nested values use double underscores as separators.
//! The platform variables set by the hosting environment (`AZURE_AI_PROJECT_ENDPOINT`,
//! `PORT`, `FUNCTIONS_CUSTOMHANDLER_PORT`, ...) are read as defaults underneath.
//!
//! # Example
//!
//! ```no_run
//! use agent_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod agents;
mod credential;
mod error;
mod function;
mod server;

pub use agents::AgentsConfig;
pub use credential::CredentialConfig;
pub use error::{ConfigError, ValidationError};
pub use function::FunctionConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Platform variables and the keys they provide defaults for.
const PLATFORM_VARIABLES: [(&str, &str); 10] = [
    ("AZURE_AI_PROJECT_ENDPOINT", "agents.endpoint"),
    ("AZURE_AI_USER_AGENT_ID", "agents.agent_id"),
    ("CORS_ORIGINS", "server.cors_origins"),
    ("PORT", "server.port"),
    ("FUNCTIONS_CUSTOMHANDLER_PORT", "function.port"),
    ("AZURE_TENANT_ID", "credential.tenant_id"),
    ("AZURE_CLIENT_ID", "credential.client_id"),
    ("AZURE_CLIENT_SECRET", "credential.client_secret"),
    ("IDENTITY_ENDPOINT", "credential.identity_endpoint"),
    ("IDENTITY_HEADER", "credential.identity_header"),
];

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote agent service (endpoint, agent id)
    pub agents: AgentsConfig,

    /// Credential sources for the agent service
    #[serde(default)]
    pub credential: CredentialConfig,

    /// Function host settings
    #[serde(default)]
    pub function: FunctionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Registers the platform variables as defaults
    /// 3. Reads environment variables with `AGENT_GATEWAY` prefix
    /// 4. Uses `__` (double underscore) to separate nested values
    /// 5. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AGENT_GATEWAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `AGENT_GATEWAY__AGENTS__AGENT_ID=...` -> `agents.agent_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        for (variable, key) in PLATFORM_VARIABLES {
            if let Ok(value) = std::env::var(variable) {
                if !value.is_empty() {
                    builder = builder.set_default(key, value)?;
                }
            }
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("AGENT_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.agents.validate()?;
        self.credential.validate()?;
        self.function.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Port the function host process listens on.
    pub fn function_port(&self) -> u16 {
        self.function.port_or(self.server.port)
    }
}
