//! Activity Tracker API
//!
//! Per-user activities, GPS routes and track points stored in a hosted
//! Postgres project, behind access tokens verified against the identity
//! provider's published signing keys.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use api::state::AppState;
use domain::{IdentityClient, TokenVerifier};
use infrastructure::auth::{
    HttpKeySetSource, JwksTokenVerifier, KeySetCache, KeySetSourceConfig, VerifierConfig,
};
use infrastructure::identity::{GoTrueIdentityClient, IdentityConfig};
use infrastructure::storage::{RestConfig, StorageConfig, StorageFactory};

/// Build the application state from configuration
///
/// The signing key cache is populated once here; a failed fetch leaves it
/// empty and startup continues.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let supabase = &config.supabase;
    let base_url = supabase
        .base_url()
        .context("supabase.url (or SUPABASE_URL) must be set")?;

    let mut source_config =
        KeySetSourceConfig::new(base_url).with_request_timeout(supabase.request_timeout());
    if let Some(api_key) = &supabase.api_key {
        source_config = source_config.with_api_key(api_key.clone());
    }

    let source = Arc::new(HttpKeySetSource::new(&source_config)?);
    info!(url = %source.url(), "Loading signing keys");

    let cache = Arc::new(KeySetCache::initialize(source).await);
    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwksTokenVerifier::new(
        cache,
        VerifierConfig::default()
            .with_audience(supabase.audience.clone())
            .with_leeway(supabase.leeway_secs),
    ));

    let api_key = supabase.api_key.clone().unwrap_or_default();
    if api_key.is_empty() {
        warn!("No supabase.api_key configured; hosted requests will be rejected");
    }

    let identity: Arc<dyn IdentityClient> = Arc::new(GoTrueIdentityClient::new(
        &IdentityConfig::new(base_url, api_key.clone())
            .with_request_timeout(supabase.request_timeout()),
    )?);

    let storage_config = if api_key.is_empty() {
        StorageConfig::InMemory
    } else {
        StorageConfig::Rest(
            RestConfig::new(base_url, api_key).with_request_timeout(supabase.request_timeout()),
        )
    };
    let tables = StorageFactory::create(&storage_config)?;

    Ok(AppState::new(verifier, identity, tables))
}
