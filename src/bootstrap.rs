//! Process startup shared by both binaries: configuration, tracing,
//! dependency wiring and the serve loop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::adapters::agents::{RestAgentConfig, RestAgentService};
use crate::adapters::credentials::{
    CachedCredential, ChainedCredential, ClientSecretCredential, ManagedIdentityCredential,
    StaticTokenCredential,
};
use crate::adapters::http::{
    function_host_router, standalone_router, CorsConfigError, CorsPolicy, FunctionHostState,
    StandaloneState,
};
use crate::application::ChatGateway;
use crate::config::{AppConfig, ConfigError, CredentialConfig, ServerConfig};
use crate::ports::{AgentServiceError, CredentialProvider};

/// Anything that stops the process from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cors(#[from] CorsConfigError),

    #[error("Failed to create agent service client: {0}")]
    AgentClient(#[from] AgentServiceError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Failed to initialise logging: {0}")]
    Tracing(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads and validates configuration.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let config = AppConfig::load()?;
    config.validate().map_err(ConfigError::from)?;
    Ok(config)
}

/// Installs the global subscriber. `RUST_LOG` wins over `server.log_level`;
/// production logs are JSON lines.
pub fn init_tracing(server: &ServerConfig) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .map_err(|e| StartupError::Tracing(e.to_string()))?;

    let result = if server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };
    result.map_err(|e| StartupError::Tracing(e.to_string()))
}

/// Default credential chain: static token, then client secret, then managed
/// identity, behind a token cache.
pub fn credential_chain(
    config: &CredentialConfig,
    client: reqwest::Client,
) -> Arc<dyn CredentialProvider> {
    let mut chain = ChainedCredential::new();

    if let Some(token) = &config.access_token {
        chain = chain.with_source(
            "static_token",
            Arc::new(StaticTokenCredential::new(token.expose_secret().clone())),
        );
    }

    if config.has_client_secret() {
        if let (Some(tenant_id), Some(client_id), Some(secret)) =
            (&config.tenant_id, &config.client_id, &config.client_secret)
        {
            chain = chain.with_source(
                "client_secret",
                Arc::new(
                    ClientSecretCredential::new(
                        client.clone(),
                        tenant_id,
                        client_id,
                        secret.expose_secret().clone(),
                    )
                    .with_authority_host(&config.authority_host),
                ),
            );
        }
    }

    let mut managed = ManagedIdentityCredential::new(
        client,
        config.identity_endpoint.clone(),
        config
            .identity_header
            .as_ref()
            .map(|h| h.expose_secret().clone()),
    );
    if let Some(client_id) = &config.managed_identity_client_id {
        managed = managed.with_client_id(client_id);
    }
    chain = chain.with_source("managed_identity", Arc::new(managed));

    tracing::debug!(sources = ?chain.source_names(), "Credential chain configured");
    Arc::new(CachedCredential::new(Arc::new(chain)))
}

/// Builds the gateway and its long-lived agent service client.
pub fn build_gateway(config: &AppConfig) -> Result<ChatGateway, StartupError> {
    let http = reqwest::Client::builder().build()?;
    let credentials = credential_chain(&config.credential, http.clone());

    let agents_config = RestAgentConfig::new(&config.agents.endpoint)
        .with_api_version(&config.agents.api_version)
        .with_poll_interval(config.agents.poll_interval())
        .with_token_scope(&config.agents.token_scope);
    let agents = RestAgentService::with_client(agents_config, http, credentials)?;

    Ok(ChatGateway::new(Arc::new(agents), &config.agents.agent_id))
}

/// Runs the standalone server until Ctrl-C.
pub async fn run_standalone() -> Result<(), StartupError> {
    let config = load_config()?;
    init_tracing(&config.server)?;

    let state = StandaloneState::new(
        build_gateway(&config)?,
        CorsPolicy::from_server_config(&config.server)?,
    );
    serve(config.server.socket_addr()?, standalone_router(state)).await
}

/// Runs the function host custom handler until Ctrl-C.
pub async fn run_function_host() -> Result<(), StartupError> {
    let config = load_config()?;
    init_tracing(&config.server)?;

    let state = FunctionHostState::new(
        build_gateway(&config)?,
        CorsPolicy::from_server_config(&config.server)?,
    );
    let router = function_host_router(&config.function.function_name, state);
    serve(
        config.server.socket_addr_with_port(config.function_port())?,
        router,
    )
    .await
}

async fn serve(addr: SocketAddr, router: Router) -> Result<(), StartupError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Agent gateway listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Agent gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentsConfig, FunctionConfig};
    use secrecy::Secret;

    fn app_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            agents: AgentsConfig {
                endpoint: "https://example.services.ai.azure.com/api/projects/demo/".to_string(),
                agent_id: "asst_123".to_string(),
                api_version: "v1".to_string(),
                poll_interval_ms: 250,
                token_scope: "https://ai.azure.com/.default".to_string(),
            },
            credential: CredentialConfig::default(),
            function: FunctionConfig::default(),
        }
    }

    #[tokio::test]
    async fn static_token_comes_first() {
        let config = CredentialConfig {
            access_token: Some(Secret::new("configured".to_string())),
            ..Default::default()
        };
        let provider = credential_chain(&config, reqwest::Client::new());

        let token = provider.get_token("https://ai.azure.com/.default").await.unwrap();
        assert_eq!(token.secret(), "configured");
    }

    #[test]
    fn gateway_uses_configured_agent() {
        let gateway = build_gateway(&app_config()).unwrap();
        assert_eq!(gateway.agent_id(), "asst_123");
    }
}
