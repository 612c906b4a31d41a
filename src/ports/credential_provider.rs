//! Credential Provider Port - bearer tokens for the remote agent service.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::time::{Duration, Instant};

/// Port for acquiring access tokens.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns a token valid for `scope`.
    async fn get_token(&self, scope: &str) -> Result<AccessToken, CredentialError>;
}

/// A bearer token and when it stops being valid.
#[derive(Debug, Clone)]
pub struct AccessToken {
    token: Secret<String>,
    /// `None` means the token does not expire.
    pub expires_at: Option<Instant>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_at: Option<Instant>) -> Self {
        Self {
            token: Secret::new(token.into()),
            expires_at,
        }
    }

    /// Token that expires `lifetime` from now. A lifetime past what `Instant`
    /// can represent is treated as no expiry.
    pub fn expiring_in(token: impl Into<String>, lifetime: Duration) -> Self {
        Self::new(token, Instant::now().checked_add(lifetime))
    }

    /// Exposes the raw token (for the Authorization header).
    pub fn secret(&self) -> &str {
        self.token.expose_secret()
    }

    /// True if the token expires within `margin`.
    pub fn expires_within(&self, margin: Duration) -> bool {
        match self.expires_at {
            Some(at) => Instant::now()
                .checked_add(margin)
                .map_or(true, |deadline| at <= deadline),
            None => false,
        }
    }
}

/// Credential acquisition errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CredentialError {
    /// This source cannot be used in the current environment.
    #[error("credential unavailable: {0}")]
    Unavailable(String),

    /// The identity provider rejected or failed the request.
    #[error("token request failed: {0}")]
    Request(String),

    /// Every source in a chain failed.
    #[error("no credential source succeeded: {}", .0.join("; "))]
    Exhausted(Vec<String>),
}

impl CredentialError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }
}
