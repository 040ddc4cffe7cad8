//! Health check endpoints for orchestrator probes

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Returns 200 while the process is serving requests
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check
///
/// Reports the number of cached signing keys. An empty cache is degraded but
/// still ready: unprotected routes work and the first verification retries
/// the key fetch.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let signing_keys = check_signing_keys(&state);
    let response = HealthResponse {
        status: signing_keys.status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![signing_keys]),
    };

    (StatusCode::OK, Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn check_signing_keys(state: &AppState) -> HealthCheck {
    let count = state.verifier.cached_key_count();

    let (status, message) = if count == 0 {
        (HealthStatus::Degraded, "no signing keys cached".to_string())
    } else {
        (HealthStatus::Healthy, format!("{} signing keys cached", count))
    };

    HealthCheck {
        name: "signing_keys".to_string(),
        status,
        message: Some(message),
    }
}
