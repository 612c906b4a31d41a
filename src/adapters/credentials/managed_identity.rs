//! Managed identity: App Service / Functions identity endpoint, or the
//! instance metadata service on VMs and containers.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use super::token_response::read_token_response;
use crate::ports::{AccessToken, CredentialError, CredentialProvider};

const APP_SERVICE_API_VERSION: &str = "2019-08-01";
const IMDS_API_VERSION: &str = "2018-02-01";
const IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

/// IMDS is link-local; off Azure it never answers.
const IMDS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
enum IdentitySource {
    AppService {
        endpoint: String,
        header: Secret<String>,
    },
    Imds {
        endpoint: String,
    },
}

/// Token source for system- or user-assigned managed identities.
#[derive(Debug, Clone)]
pub struct ManagedIdentityCredential {
    client: Client,
    source: IdentitySource,
    client_id: Option<String>,
}

impl ManagedIdentityCredential {
    /// Uses the App Service identity endpoint when both values are set,
    /// otherwise the instance metadata service.
    pub fn new(
        client: Client,
        identity_endpoint: Option<String>,
        identity_header: Option<String>,
    ) -> Self {
        let source = match (identity_endpoint, identity_header) {
            (Some(endpoint), Some(header)) => IdentitySource::AppService {
                endpoint,
                header: Secret::new(header),
            },
            _ => IdentitySource::Imds {
                endpoint: IMDS_ENDPOINT.to_string(),
            },
        };
        Self {
            client,
            source,
            client_id: None,
        }
    }

    /// Instance metadata service at a custom address.
    pub fn imds(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            source: IdentitySource::Imds {
                endpoint: endpoint.into(),
            },
            client_id: None,
        }
    }

    /// Selects a user-assigned identity.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn uses_app_service_endpoint(&self) -> bool {
        matches!(self.source, IdentitySource::AppService { .. })
    }

    /// Managed identity endpoints take a resource, not a scope.
    fn resource(scope: &str) -> &str {
        scope.trim_end_matches("/.default")
    }
}

#[async_trait]
impl CredentialProvider for ManagedIdentityCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken, CredentialError> {
        let resource = Self::resource(scope);
        let mut query = vec![("resource", resource)];
        if let Some(client_id) = &self.client_id {
            query.push(("client_id", client_id.as_str()));
        }

        let (source_name, request) = match &self.source {
            IdentitySource::AppService { endpoint, header } => {
                query.push(("api-version", APP_SERVICE_API_VERSION));
                (
                    "identity endpoint",
                    self.client
                        .get(endpoint)
                        .header("X-IDENTITY-HEADER", header.expose_secret().as_str()),
                )
            }
            IdentitySource::Imds { endpoint } => {
                query.push(("api-version", IMDS_API_VERSION));
                (
                    "instance metadata service",
                    self.client
                        .get(endpoint)
                        .header("Metadata", "true")
                        .timeout(IMDS_TIMEOUT),
                )
            }
        };

        tracing::debug!(resource, "Requesting managed identity token from {}", source_name);
        let response = request.query(&query).send().await.map_err(|e| {
            CredentialError::unavailable(format!("{} unreachable: {}", source_name, e))
        })?;

        read_token_response(source_name, response).await
    }
}
