//! Credential configuration for the agent service

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;

/// Credential sources, tried in order: static token, client secret,
/// managed identity.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    /// Pre-issued bearer token
    pub access_token: Option<Secret<String>>,

    /// Directory (tenant) of the service principal
    pub tenant_id: Option<String>,

    /// Application id of the service principal
    pub client_id: Option<String>,

    /// Client secret of the service principal
    pub client_secret: Option<Secret<String>>,

    /// OAuth2 authority
    #[serde(default = "default_authority_host")]
    pub authority_host: String,

    /// App Service / Functions identity endpoint
    pub identity_endpoint: Option<String>,

    /// Header value required by the identity endpoint
    pub identity_header: Option<Secret<String>>,

    /// Client id of a user-assigned managed identity
    pub managed_identity_client_id: Option<String>,
}

impl CredentialConfig {
    /// True when tenant, client id and client secret are all set.
    pub fn has_client_secret(&self) -> bool {
        let set = |v: &Option<String>| v.as_ref().is_some_and(|s| !s.is_empty());
        set(&self.tenant_id) && set(&self.client_id) && self.client_secret.is_some()
    }

    /// Validate credential configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.authority_host.starts_with("http://") && !self.authority_host.starts_with("https://")
        {
            return Err(ValidationError::InvalidAuthorityHost);
        }
        Ok(())
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            tenant_id: None,
            client_id: None,
            client_secret: None,
            authority_host: default_authority_host(),
            identity_endpoint: None,
            identity_header: None,
            managed_identity_client_id: None,
        }
    }
}

fn default_authority_host() -> String {
    "https://login.microsoftonline.com".to_string()
}
