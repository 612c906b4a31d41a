//! Token cache in front of any credential provider.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::ports::{AccessToken, CredentialError, CredentialProvider};

/// Tokens are refreshed this long before they expire.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(300);

/// Caches tokens per scope and refreshes them shortly before expiry.
pub struct CachedCredential {
    inner: Arc<dyn CredentialProvider>,
    refresh_margin: Duration,
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl CachedCredential {
    pub fn new(inner: Arc<dyn CredentialProvider>) -> Self {
        Self {
            inner,
            refresh_margin: DEFAULT_REFRESH_MARGIN,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    async fn cached(&self, scope: &str) -> Option<AccessToken> {
        let tokens = self.tokens.read().await;
        tokens
            .get(scope)
            .filter(|token| !token.expires_within(self.refresh_margin))
            .cloned()
    }
}

#[async_trait]
impl CredentialProvider for CachedCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken, CredentialError> {
        if let Some(token) = self.cached(scope).await {
            return Ok(token);
        }

        let mut tokens = self.tokens.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = tokens
            .get(scope)
            .filter(|token| !token.expires_within(self.refresh_margin))
        {
            return Ok(token.clone());
        }

        let token = self.inner.get_token(scope).await?;
        tokens.insert(scope.to_string(), token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        lifetime: Option<Duration>,
        fail: bool,
    }

    impl Counting {
        fn new(lifetime: Option<Duration>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                lifetime,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                lifetime: None,
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialProvider for Counting {
        async fn get_token(&self, scope: &str) -> Result<AccessToken, CredentialError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(CredentialError::request("denied"));
            }
            let token = format!("{}#{}", scope, n);
            Ok(match self.lifetime {
                Some(lifetime) => AccessToken::expiring_in(token, lifetime),
                None => AccessToken::new(token, None),
            })
        }
    }

    #[tokio::test]
    async fn reuses_fresh_token() {
        let inner = Counting::new(Some(Duration::from_secs(3600)));
        let cache = CachedCredential::new(inner.clone());

        let first = cache.get_token("s").await.unwrap();
        let second = cache.get_token("s").await.unwrap();

        assert_eq!(first.secret(), "s#1");
        assert_eq!(second.secret(), "s#1");
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn refreshes_token_inside_margin() {
        let inner = Counting::new(Some(Duration::from_secs(60)));
        let cache = CachedCredential::new(inner.clone());

        cache.get_token("s").await.unwrap();
        let second = cache.get_token("s").await.unwrap();

        assert_eq!(second.secret(), "s#2");
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn caches_per_scope() {
        let inner = Counting::new(None);
        let cache = CachedCredential::new(inner.clone());

        assert_eq!(cache.get_token("a").await.unwrap().secret(), "a#1");
        assert_eq!(cache.get_token("b").await.unwrap().secret(), "b#2");
        assert_eq!(cache.get_token("a").await.unwrap().secret(), "a#1");
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let inner = Counting::failing();
        let cache = CachedCredential::new(inner.clone());

        assert!(cache.get_token("s").await.is_err());
        assert!(cache.get_token("s").await.is_err());
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn custom_margin() {
        let inner = Counting::new(Some(Duration::from_secs(60)));
        let cache = CachedCredential::new(inner.clone()).with_refresh_margin(Duration::from_secs(1));

        cache.get_token("s").await.unwrap();
        cache.get_token("s").await.unwrap();
        assert_eq!(inner.calls(), 1);
    }
}
