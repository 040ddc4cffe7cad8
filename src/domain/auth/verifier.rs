use std::fmt::Debug;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;

use super::{AuthError, Claims};

/// Verifies bearer tokens and hands back their claims
#[async_trait]
pub trait TokenVerifier: Send + Sync + Debug {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;

    /// Number of signing keys currently available to the verifier; readiness
    /// reports degraded while this is zero
    fn cached_key_count(&self) -> usize;
}

/// Source of the identity provider's published key set
#[async_trait]
pub trait KeySetSource: Send + Sync + Debug {
    /// Fetch the current key set. `cache_bust` asks the source to defeat any
    /// intermediary HTTP caching.
    async fn fetch(&self, cache_bust: bool) -> Result<JwkSet, AuthError>;
}
