//! Authentication infrastructure
//!
//! Provides the cached identity provider key set and the bearer token
//! verifier built on top of it.

pub mod jwks;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use jwks::{jwks_url, HttpKeySetSource, KeySetCache, KeySetSourceConfig};
pub use verifier::{JwksTokenVerifier, VerifierConfig};
