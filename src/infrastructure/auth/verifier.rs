//! Bearer token verification against the cached key set

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::jwk::Jwk;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::jwks::KeySetCache;
use crate::domain::auth::{AuthError, Claims, TokenVerifier};

/// Claim validation settings
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Accepted audiences; `None` turns audience validation off
    pub audience: Option<Vec<String>>,
    /// Clock skew tolerated on `exp` and `nbf`, in seconds
    pub leeway_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            audience: None,
            leeway_secs: 0,
        }
    }
}

impl VerifierConfig {
    pub fn with_audience(mut self, audience: Vec<String>) -> Self {
        self.audience = if audience.is_empty() {
            None
        } else {
            Some(audience)
        };
        self
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

/// Verifies asymmetric, key-identified tokens issued by the identity provider
///
/// Shared-secret (HS*) tokens are rejected as unsupported: no secret is ever
/// configured, and accepting them would let a caller pick the verification
/// scheme.
#[derive(Debug, Clone)]
pub struct JwksTokenVerifier {
    cache: Arc<KeySetCache>,
    config: VerifierConfig,
}

impl JwksTokenVerifier {
    pub fn new(cache: Arc<KeySetCache>, config: VerifierConfig) -> Self {
        Self { cache, config }
    }

    pub fn cache(&self) -> &Arc<KeySetCache> {
        &self.cache
    }

    /// Find the key for `kid`, refreshing the cache once on a miss
    async fn resolve_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(key) = self.cache.lookup(kid) {
            return Ok(key);
        }

        debug!(kid = %kid, "Signing key not cached, refreshing key set");

        if let Err(err) = self.cache.refresh().await {
            warn!(kid = %kid, error = %err, "Key set refresh failed");
        }

        self.cache
            .lookup(kid)
            .ok_or_else(|| AuthError::unknown_key(kid))
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = self.config.leeway_secs;

        match &self.config.audience {
            Some(audience) => validation.set_audience(audience.as_slice()),
            None => validation.validate_aud = false,
        }

        validation
    }
}

#[async_trait]
impl TokenVerifier for JwksTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::malformed(e.to_string()))?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::unsupported("token header carries no key identifier"))?;

        if is_symmetric(header.alg) {
            return Err(AuthError::unsupported(format!(
                "shared-secret algorithm {:?} is not accepted",
                header.alg
            )));
        }

        let jwk = self.resolve_key(&kid).await?;

        let key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            AuthError::invalid_signature(format!("key '{}' is not usable: {}", kid, e))
        })?;

        let data = decode::<Map<String, Value>>(token, &key, &self.validation(header.alg))
            .map_err(|e| AuthError::invalid_signature(e.to_string()))?;

        Ok(Claims::new(data.claims))
    }

    fn cached_key_count(&self) -> usize {
        self.cache.len()
    }
}

fn is_symmetric(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}
