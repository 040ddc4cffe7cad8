//! Account endpoints
//!
//! Sign-up and sign-in are relayed to the identity provider; `/me` echoes the
//! verified claims of the caller.

use axum::{extract::State, http::StatusCode, routing::post, Router};
use serde_json::Value;
use tracing::{debug, info};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Claims, Credentials};

/// Create the account router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
}

/// POST /auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    credentials.validate()?;
    debug!(email = %credentials.email, "Registering account");

    let body = state.identity.sign_up(&credentials).await?;
    info!(email = %credentials.email, "Account registered");

    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /auth/signin
///
/// Returns the provider's session unchanged, including the access token.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>, ApiError> {
    credentials.validate()?;
    debug!(email = %credentials.email, "Signing in");

    Ok(Json(state.identity.sign_in(&credentials).await?))
}

/// GET /me
pub async fn get_current_user(RequireUser(claims): RequireUser) -> Json<Claims> {
    Json(claims)
}
