//! OAuth2 client-credentials grant against the identity platform.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use super::token_response::read_token_response;
use crate::ports::{AccessToken, CredentialError, CredentialProvider};

/// Service principal authenticated with a client secret.
#[derive(Debug, Clone)]
pub struct ClientSecretCredential {
    client: Client,
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: Secret<String>,
}

impl ClientSecretCredential {
    pub fn new(
        client: Client,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            authority_host: "https://login.microsoftonline.com".to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
        }
    }

    /// Overrides the authority host (sovereign clouds, tests).
    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = authority_host.into().trim_end_matches('/').to_string();
        self
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, self.tenant_id
        )
    }
}

#[async_trait]
impl CredentialProvider for ClientSecretCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken, CredentialError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_str()),
            ("scope", scope),
        ];

        tracing::debug!(tenant_id = %self.tenant_id, "Requesting client credentials token");
        let response = self
            .client
            .post(self.token_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| CredentialError::request(format!("token endpoint unreachable: {}", e)))?;

        read_token_response("token endpoint", response).await
    }
}
