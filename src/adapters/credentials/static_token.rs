//! Pre-issued bearer token.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use crate::ports::{AccessToken, CredentialError, CredentialProvider};

/// Returns the same configured token for every scope.
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    token: Secret<String>,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenCredential {
    async fn get_token(&self, _scope: &str) -> Result<AccessToken, CredentialError> {
        Ok(AccessToken::new(self.token.expose_secret().clone(), None))
    }
}
