//! Identity provider contract for account sign-up and sign-in
//!
//! Accounts and token issuance live entirely with the identity provider; this
//! service only relays the caller's credentials and the provider's session.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Email/password pair submitted by a caller
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(DomainError::validation("A valid email address is required"));
        }

        if self.password.is_empty() {
            return Err(DomainError::validation("Password cannot be empty"));
        }

        Ok(())
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .finish()
    }
}

/// Delegates account operations to the hosted identity provider
#[async_trait]
pub trait IdentityClient: Send + Sync + Debug {
    /// Register a new account; returns the provider's response body
    async fn sign_up(&self, credentials: &Credentials) -> Result<Value, DomainError>;

    /// Exchange credentials for a session; returns the provider's response body
    async fn sign_in(&self, credentials: &Credentials) -> Result<Value, DomainError>;
}
