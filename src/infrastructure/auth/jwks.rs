//! Identity provider key set fetching and caching
//!
//! The cache holds the provider's published signing keys for the life of the
//! process. It is filled once at startup and replaced wholesale whenever a
//! token names a key the cache does not know. Readers take a lock-free
//! snapshot of the current list, so a refresh never exposes a half-written
//! key set.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::auth::{AuthError, KeySetSource};

/// Path of the published key set, relative to the identity provider base URL
pub const JWKS_PATH: &str = "/auth/v1/.well-known/jwks.json";

/// Query parameter carrying the random nonce on cache-busting fetches
pub const CACHE_BUST_PARAM: &str = "nocache";

/// Build the key set URL for an identity provider base URL
pub fn jwks_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), JWKS_PATH)
}

/// Configuration for the HTTP key set source
#[derive(Debug, Clone)]
pub struct KeySetSourceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl KeySetSourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Key set document whose entries are parsed one at a time
#[derive(Debug, Deserialize)]
struct RawKeySet {
    keys: Vec<Value>,
}

impl RawKeySet {
    /// Keep every entry that parses as a JWK; unsupported entries are skipped
    fn into_key_set(self) -> JwkSet {
        let keys = self
            .keys
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Jwk>(entry) {
                Ok(jwk) => Some(jwk),
                Err(e) => {
                    warn!(error = %e, "Skipping unsupported key in JWKS");
                    None
                }
            })
            .collect();

        JwkSet { keys }
    }
}

/// Fetches the key set from the identity provider's well-known endpoint
#[derive(Clone)]
pub struct HttpKeySetSource {
    url: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl Debug for HttpKeySetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpKeySetSource")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

impl HttpKeySetSource {
    pub fn new(config: &KeySetSourceConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuthError::fetch_failure(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: jwks_url(&config.base_url),
            api_key: config.api_key.clone(),
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    async fn fetch(&self, cache_bust: bool) -> Result<JwkSet, AuthError> {
        let mut request = self.http_client.get(&self.url);

        if cache_bust {
            request = request.query(&[(CACHE_BUST_PARAM, Uuid::new_v4().to_string())]);
        }

        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::fetch_failure(format!("JWKS request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::fetch_failure(format!(
                "JWKS endpoint returned status {}",
                response.status()
            )));
        }

        let raw = response
            .json::<RawKeySet>()
            .await
            .map_err(|e| AuthError::fetch_failure(format!("Failed to parse JWKS: {}", e)))?;

        Ok(raw.into_key_set())
    }
}

/// In-memory view of the identity provider's current signing keys
pub struct KeySetCache {
    keys: ArcSwap<Vec<Jwk>>,
    source: Arc<dyn KeySetSource>,
}

impl Debug for KeySetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySetCache")
            .field("keys", &self.len())
            .field("source", &self.source)
            .finish()
    }
}

impl KeySetCache {
    /// Fetch the key set and build the cache
    ///
    /// A failed fetch is logged and leaves the cache empty; the failure then
    /// shows up on the first verification instead of at startup.
    pub async fn initialize(source: Arc<dyn KeySetSource>) -> Self {
        let keys = match source.fetch(false).await {
            Ok(set) => {
                info!(keys = set.keys.len(), "Loaded identity provider signing keys");
                set.keys
            }
            Err(err) => {
                warn!(error = %err, "Could not load signing keys, starting with an empty key set");
                Vec::new()
            }
        };

        Self::with_keys(source, keys)
    }

    /// Build a cache around an already known key list
    pub fn with_keys(source: Arc<dyn KeySetSource>, keys: Vec<Jwk>) -> Self {
        Self {
            keys: ArcSwap::from_pointee(keys),
            source,
        }
    }

    /// Find the key whose `kid` matches
    pub fn lookup(&self, kid: &str) -> Option<Jwk> {
        self.keys
            .load()
            .iter()
            .find(|key| key.common.key_id.as_deref() == Some(kid))
            .cloned()
    }

    /// Re-fetch the key set past any HTTP cache and replace the cached list
    ///
    /// On failure the previous list stays in place. Returns the number of
    /// keys now cached.
    pub async fn refresh(&self) -> Result<usize, AuthError> {
        let set = self.source.fetch(true).await?;
        let count = set.keys.len();

        self.keys.store(Arc::new(set.keys));
        debug!(keys = count, "Replaced cached signing keys");

        Ok(count)
    }

    /// Current key list; stays valid even if a refresh swaps it out
    pub fn snapshot(&self) -> Arc<Vec<Jwk>> {
        self.keys.load_full()
    }

    pub fn len(&self) -> usize {
        self.keys.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::mock::MockKeySetSource;
    use crate::infrastructure::auth::test_support::{jwk_set, key_a, key_b};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_jwks_url() {
        assert_eq!(
            jwks_url("https://project.supabase.co"),
            "https://project.supabase.co/auth/v1/.well-known/jwks.json"
        );
        assert_eq!(
            jwks_url("https://project.supabase.co/"),
            "https://project.supabase.co/auth/v1/.well-known/jwks.json"
        );
    }

    #[tokio::test]
    async fn test_initialize_loads_keys() {
        let source = Arc::new(MockKeySetSource::new(vec![Ok(jwk_set(&[key_a()]))]));
        let cache = KeySetCache::initialize(source.clone()).await;

        assert_eq!(cache.len(), 1);
        assert!(cache.lookup(&key_a().kid).is_some());
        assert!(cache.lookup(&key_b().kid).is_none());
        assert_eq!(source.fetches(), 1);
        assert_eq!(source.cache_busting_fetches(), 0);
    }

    #[tokio::test]
    async fn test_initialize_failure_yields_empty_cache() {
        let source = Arc::new(MockKeySetSource::new(vec![Err(AuthError::fetch_failure(
            "connection refused",
        ))]));
        let cache = KeySetCache::initialize(source).await;

        assert!(cache.is_empty());
        assert!(cache.lookup(&key_a().kid).is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_whole_list() {
        let source = Arc::new(MockKeySetSource::new(vec![
            Ok(jwk_set(&[key_a()])),
            Ok(jwk_set(&[key_b()])),
        ]));
        let cache = KeySetCache::initialize(source.clone()).await;

        let count = cache.refresh().await.unwrap();

        assert_eq!(count, 1);
        assert!(cache.lookup(&key_a().kid).is_none());
        assert!(cache.lookup(&key_b().kid).is_some());
        assert_eq!(source.cache_busting_fetches(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_keys() {
        let source = Arc::new(MockKeySetSource::new(vec![
            Ok(jwk_set(&[key_a()])),
            Err(AuthError::fetch_failure("timeout")),
        ]));
        let cache = KeySetCache::initialize(source).await;

        let result = cache.refresh().await;

        assert!(matches!(result, Err(AuthError::KeySetFetchFailure(_))));
        assert!(cache.lookup(&key_a().kid).is_some());
    }

    #[tokio::test]
    async fn test_snapshot_survives_refresh() {
        let source = Arc::new(MockKeySetSource::new(vec![
            Ok(jwk_set(&[key_a()])),
            Ok(jwk_set(&[key_a(), key_b()])),
        ]));
        let cache = KeySetCache::initialize(source).await;

        let before = cache.snapshot();
        cache.refresh().await.unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(cache.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_http_source_fetches_key_set() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .and(header("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwk_set(&[key_a()])))
            .mount(&server)
            .await;

        let config = KeySetSourceConfig::new(server.uri()).with_api_key("anon-key");
        let source = HttpKeySetSource::new(&config).unwrap();

        let set = source.fetch(false).await.unwrap();
        assert_eq!(set.keys.len(), 1);
        assert_eq!(set.keys[0].common.key_id.as_deref(), Some(key_a().kid.as_str()));
    }

    #[tokio::test]
    async fn test_http_source_cache_bust_adds_nonce() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwk_set(&[key_a()])))
            .mount(&server)
            .await;

        let source = HttpKeySetSource::new(&KeySetSourceConfig::new(server.uri())).unwrap();

        source.fetch(false).await.unwrap();
        source.fetch(true).await.unwrap();
        source.fetch(true).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let nonces: Vec<Option<String>> = requests
            .iter()
            .map(|r| {
                r.url
                    .query_pairs()
                    .find(|(k, _)| k == CACHE_BUST_PARAM)
                    .map(|(_, v)| v.into_owned())
            })
            .collect();

        assert_eq!(nonces.len(), 3);
        assert!(nonces[0].is_none());
        assert!(nonces[1].is_some());
        assert!(nonces[2].is_some());
        assert_ne!(nonces[1], nonces[2]);
    }

    #[tokio::test]
    async fn test_http_source_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpKeySetSource::new(&KeySetSourceConfig::new(server.uri())).unwrap();
        let result = source.fetch(false).await;

        assert!(matches!(result, Err(AuthError::KeySetFetchFailure(_))));
    }

    #[tokio::test]
    async fn test_http_source_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let source = HttpKeySetSource::new(&KeySetSourceConfig::new(server.uri())).unwrap();
        let cache = KeySetCache::initialize(Arc::new(source)).await;

        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_http_source_skips_unsupported_keys() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "keys": [
                { "kty": "unknown", "kid": "future-key" },
                serde_json::to_value(&key_a().jwk).unwrap(),
                { "kty": "EC", "kid": "odd-curve", "crv": "P-999", "x": "AA", "y": "AA" },
            ]
        });

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let source = HttpKeySetSource::new(&KeySetSourceConfig::new(server.uri())).unwrap();
        let set = source.fetch(false).await.unwrap();

        assert_eq!(set.keys.len(), 1);
        assert_eq!(set.keys[0].common.key_id.as_deref(), Some(key_a().kid.as_str()));
    }

    #[tokio::test]
    async fn test_http_source_requires_keys_field() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "issuer": "x" })))
            .mount(&server)
            .await;

        let source = HttpKeySetSource::new(&KeySetSourceConfig::new(server.uri())).unwrap();
        let result = source.fetch(false).await;

        assert!(matches!(result, Err(AuthError::KeySetFetchFailure(_))));
    }
}
