//! Token endpoint response shared by the OAuth2 and managed identity sources.

use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::ports::{AccessToken, CredentialError};

/// Lifetime assumed when an endpoint reports none.
const DEFAULT_LIFETIME: Duration = Duration::from_secs(3600);

/// Identity endpoints report numbers either as JSON numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Seconds {
    Number(u64),
    Text(String),
}

impl Seconds {
    fn value(&self) -> Option<u64> {
        match self {
            Seconds::Number(n) => Some(*n),
            Seconds::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// `{"access_token", "expires_in"?, "expires_on"?}`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<Seconds>,
    #[serde(default)]
    expires_on: Option<Seconds>,
}

impl TokenResponse {
    /// Remaining lifetime: `expires_in` when present, else derived from the
    /// absolute `expires_on` epoch seconds.
    fn lifetime(&self) -> Duration {
        if let Some(secs) = self.expires_in.as_ref().and_then(Seconds::value) {
            return Duration::from_secs(secs);
        }
        if let Some(on) = self.expires_on.as_ref().and_then(Seconds::value) {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            return Duration::from_secs(on.saturating_sub(now));
        }
        DEFAULT_LIFETIME
    }

    pub(crate) fn into_access_token(self) -> AccessToken {
        let lifetime = self.lifetime();
        AccessToken::expiring_in(self.access_token, lifetime)
    }
}

/// Reads a token endpoint response, mapping failures to credential errors.
pub(crate) async fn read_token_response(
    source: &str,
    response: reqwest::Response,
) -> Result<AccessToken, CredentialError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CredentialError::request(format!(
            "{} returned {}: {}",
            source, status, body
        )));
    }

    let token: TokenResponse = response.json().await.map_err(|e| {
        CredentialError::request(format!("{} returned an unreadable token: {}", source, e))
    })?;
    Ok(token.into_access_token())
}
