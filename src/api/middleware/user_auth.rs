//! Bearer token authentication for user routes

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{AuthError, Claims};

/// Extractor that requires a verified access token
///
/// The token is read from `Authorization: Bearer <token>` and checked by the
/// application's [`TokenVerifier`](crate::domain::TokenVerifier). A missing
/// header and a rejected token both yield the same 403 response. Tokens
/// without a `sub` claim are rejected because every record is scoped by it.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Claims);

impl RequireUser {
    /// The caller's user id (`sub` claim)
    pub fn user_id(&self) -> &str {
        self.0.subject().unwrap_or_default()
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state.verifier.verify(&token).await.map_err(|err| {
            match &err {
                AuthError::UnknownSigningKey { .. } => warn!(kind = err.kind(), "Rejected access token"),
                _ => debug!(kind = err.kind(), "Rejected access token"),
            }
            ApiError::from(err)
        })?;

        if claims.subject().is_none_or(str::is_empty) {
            debug!(kind = "missing_subject", "Rejected access token");
            return Err(ApiError::access_denied());
        }

        Ok(RequireUser(claims))
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    match token {
        Some(token) => Ok(token.to_string()),
        None => {
            debug!(kind = "missing_token", "Rejected request without bearer token");
            Err(ApiError::access_denied())
        }
    }
}
