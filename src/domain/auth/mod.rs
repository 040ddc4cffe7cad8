//! Authentication domain - token claims, verification contract and failures

mod claims;
mod error;
mod verifier;

pub use claims::Claims;
pub use error::AuthError;
pub use verifier::{KeySetSource, TokenVerifier};

#[cfg(test)]
pub use verifier::mock;
