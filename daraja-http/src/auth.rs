//! OAuth access tokens and their cache.
//!
//! Every transaction request carries a bearer token obtained from the
//! gateway's token endpoint with HTTP Basic credentials. Tokens live for
//! about an hour, so by default a client keeps the last one in a
//! [`TokenCache`] and only asks for a new one shortly before it expires.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::DarajaError;

/// Token issued by the gateway.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// Bearer token value.
    pub access_token: String,

    /// Lifetime in seconds, as a decimal string (e.g. `"3599"`).
    #[serde(default)]
    pub expires_in: String,
}

impl AuthToken {
    /// Returns the reported lifetime, if it parses.
    #[must_use]
    pub fn lifetime(&self) -> Option<Duration> {
        self.expires_in
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Clone)]
struct CachedToken {
    token: AuthToken,
    expires_at: Instant,
}

/// Single-flight cache for the current access token.
///
/// The lock is held across a refresh, so concurrent callers that find the
/// cache empty wait for one fetch instead of each starting their own.
/// Tokens without a parseable lifetime, or whose lifetime does not exceed
/// the margin, are never cached.
///
/// Share one cache between clients with an `Arc`; [`DarajaClient`] clones
/// do this already.
///
/// [`DarajaClient`]: crate::DarajaClient
pub struct TokenCache {
    /// Subtracted from the reported lifetime.
    margin: Duration,
    state: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Creates an empty cache with the given refresh margin.
    #[must_use]
    pub fn new(margin: Duration) -> Self {
        Self {
            margin,
            state: Mutex::new(None),
        }
    }

    /// Returns the refresh margin.
    #[must_use]
    pub const fn margin(&self) -> Duration {
        self.margin
    }

    /// Returns the cached token, or runs `fetch` and caches its result.
    ///
    /// # Errors
    ///
    /// Returns whatever `fetch` returns; a failed fetch leaves the cache
    /// empty.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<AuthToken, DarajaError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AuthToken, DarajaError>>,
    {
        let mut guard = self.state.lock().await;
        if let Some(cached) = guard.as_ref() {
            if Instant::now() < cached.expires_at {
                #[cfg(feature = "telemetry")]
                tracing::debug!("daraja.token_cache.hit");
                return Ok(cached.token.clone());
            }
        }

        #[cfg(feature = "telemetry")]
        tracing::debug!("daraja.token_cache.miss");

        *guard = None;
        let token = fetch().await?;
        if let Some(ttl) = token
            .lifetime()
            .map(|lifetime| lifetime.saturating_sub(self.margin))
            .filter(|ttl| !ttl.is_zero())
        {
            *guard = Some(CachedToken {
                token: token.clone(),
                expires_at: Instant::now() + ttl,
            });
        }
        Ok(token)
    }

    /// Drops the cached token.
    pub async fn clear(&self) {
        *self.state.lock().await = None;
    }

    /// Drops the cached token if it is `access_token`.
    ///
    /// Called when the gateway rejects a token; a token refreshed by another
    /// caller in the meantime is kept.
    pub async fn invalidate(&self, access_token: &str) {
        let mut guard = self.state.lock().await;
        if guard
            .as_ref()
            .is_some_and(|cached| cached.token.access_token == access_token)
        {
            *guard = None;
        }
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("margin", &self.margin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn token(value: &str, expires_in: &str) -> AuthToken {
        AuthToken {
            access_token: value.into(),
            expires_in: expires_in.into(),
        }
    }

    #[test]
    fn test_token_decodes_and_hides_value() {
        let t: AuthToken =
            serde_json::from_str(r#"{"access_token":"c9SQxWWhmdVRlyh0zh8gZDTkubVF","expires_in":"3599"}"#)
                .unwrap();
        assert_eq!(t.lifetime(), Some(Duration::from_secs(3599)));
        assert!(!format!("{t:?}").contains("c9SQ"));
    }

    #[test]
    fn test_unparseable_lifetime() {
        assert_eq!(token("t", "").lifetime(), None);
        assert_eq!(token("t", "soon").lifetime(), None);
    }

    #[tokio::test]
    async fn test_cache_reuses_token() {
        let cache = TokenCache::new(Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        for _ in 0..3 {
            let t = cache
                .get_or_fetch(|| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(token("abc", "3599"))
                })
                .await
                .unwrap();
            assert_eq!(t.access_token, "abc");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_lifetime_not_cached() {
        let cache = TokenCache::new(Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        for _ in 0..2 {
            cache
                .get_or_fetch(|| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(token("abc", "30"))
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_not_cached() {
        let cache = TokenCache::new(Duration::from_secs(60));
        let err = cache
            .get_or_fetch(|| async { Err(DarajaError::MissingAccessToken) })
            .await
            .unwrap_err();
        assert!(matches!(err, DarajaError::MissingAccessToken));

        let t = cache
            .get_or_fetch(|| async { Ok(token("fresh", "3599")) })
            .await
            .unwrap();
        assert_eq!(t.access_token, "fresh");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let cache = Arc::new(TokenCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(token("shared", "3599"))
                    })
                    .await
                    .map(|t| t.access_token)
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "shared");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = TokenCache::new(Duration::from_secs(60));
        cache
            .get_or_fetch(|| async { Ok(token("first", "3599")) })
            .await
            .unwrap();

        cache.clear().await;
        let t = cache
            .get_or_fetch(|| async { Ok(token("second", "3599")) })
            .await
            .unwrap();
        assert_eq!(t.access_token, "second");
    }

    #[tokio::test]
    async fn test_invalidate_only_matching_token() {
        let cache = TokenCache::new(Duration::from_secs(60));
        cache
            .get_or_fetch(|| async { Ok(token("current", "3599")) })
            .await
            .unwrap();

        cache.invalidate("older").await;
        let t = cache
            .get_or_fetch(|| async { Ok(token("unexpected", "3599")) })
            .await
            .unwrap();
        assert_eq!(t.access_token, "current");

        cache.invalidate("current").await;
        let t = cache
            .get_or_fetch(|| async { Ok(token("replacement", "3599")) })
            .await
            .unwrap();
        assert_eq!(t.access_token, "replacement");
    }
}
