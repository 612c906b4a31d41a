//! Tries credential sources in order until one yields a token.

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{AccessToken, CredentialError, CredentialProvider};

struct NamedSource {
    name: String,
    provider: Arc<dyn CredentialProvider>,
}

/// Ordered list of credential sources; the first success wins.
#[derive(Default)]
pub struct ChainedCredential {
    sources: Vec<NamedSource>,
}

impl ChainedCredential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source, tried after every source already added.
    pub fn with_source(
        mut self,
        name: impl Into<String>,
        provider: Arc<dyn CredentialProvider>,
    ) -> Self {
        self.sources.push(NamedSource {
            name: name.into(),
            provider,
        });
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}

#[async_trait]
impl CredentialProvider for ChainedCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken, CredentialError> {
        let mut failures = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            match source.provider.get_token(scope).await {
                Ok(token) => {
                    tracing::debug!(source = %source.name, "Acquired access token");
                    return Ok(token);
                }
                Err(e) => {
                    tracing::debug!(source = %source.name, error = %e, "Credential source failed");
                    failures.push(format!("{}: {}", source.name, e));
                }
            }
        }

        tracing::error!(attempts = failures.len(), "No credential source produced a token");
        Err(CredentialError::Exhausted(failures))
    }
}
