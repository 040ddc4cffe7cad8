use thiserror::Error;

/// Token verification failures
///
/// Every variant surfaces to HTTP callers as the same opaque denial; the
/// distinction only matters for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is not a structurally valid compact JWS
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// The token carries no key identifier or uses a shared-secret algorithm
    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    /// No cached key matches the token's `kid`, even after a refresh
    #[error("Unknown signing key: {kid}")]
    UnknownSigningKey { kid: String },

    /// Signature or time-based claim validation failed
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// The key set could not be fetched or parsed
    #[error("Key set fetch failed: {0}")]
    KeySetFetchFailure(String),
}

impl AuthError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedToken(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedToken(message.into())
    }

    pub fn unknown_key(kid: impl Into<String>) -> Self {
        Self::UnknownSigningKey { kid: kid.into() }
    }

    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::InvalidSignature(message.into())
    }

    pub fn fetch_failure(message: impl Into<String>) -> Self {
        Self::KeySetFetchFailure(message.into())
    }

    /// Stable label used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedToken(_) => "malformed_token",
            Self::UnsupportedToken(_) => "unsupported_token",
            Self::UnknownSigningKey { .. } => "unknown_signing_key",
            Self::InvalidSignature(_) => "invalid_signature",
            Self::KeySetFetchFailure(_) => "key_set_fetch_failure",
        }
    }
}
