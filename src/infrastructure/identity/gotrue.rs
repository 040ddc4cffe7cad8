//! Hosted identity provider client (GoTrue REST API)

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::identity::{Credentials, IdentityClient};
use crate::domain::DomainError;

const SIGNUP_PATH: &str = "/auth/v1/signup";
const TOKEN_PATH: &str = "/auth/v1/token";

/// Configuration for the identity provider client
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub base_url: String,
    /// Public project key sent as the `apikey` header
    pub api_key: String,
    pub request_timeout: Duration,
}

impl IdentityConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Relays sign-up and password sign-in to the identity provider
pub struct GoTrueIdentityClient {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl Debug for GoTrueIdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueIdentityClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[hidden]")
            .finish()
    }
}

impl GoTrueIdentityClient {
    pub fn new(config: &IdentityConfig) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            http_client,
        })
    }

    async fn post(&self, url: String, credentials: &Credentials) -> Result<Value, DomainError> {
        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(credentials)
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("Identity provider unreachable: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "Identity provider rejected request");

            return Err(DomainError::upstream(status.as_u16(), provider_message(&body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| DomainError::internal(format!("Invalid identity provider response: {}", e)))
    }
}

/// Human readable message from a provider error body
fn provider_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    parsed
        .as_ref()
        .and_then(|value| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|field| value.get(*field).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl IdentityClient for GoTrueIdentityClient {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Value, DomainError> {
        self.post(format!("{}{}", self.base_url, SIGNUP_PATH), credentials)
            .await
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Value, DomainError> {
        self.post(
            format!("{}{}?grant_type=password", self.base_url, TOKEN_PATH),
            credentials,
        )
        .await
    }
}
