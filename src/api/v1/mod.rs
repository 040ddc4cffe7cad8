//! Versioned tracking API; every endpoint requires a verified user

pub mod activities;
pub mod points;
pub mod routes;

use axum::{
    routing::{delete, get},
    Router,
};
use uuid::Uuid;

use super::state::AppState;
use super::types::ApiError;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/activities",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route(
            "/activities/{activity_id}",
            get(activities::get_activity)
                .put(activities::update_activity)
                .delete(activities::delete_activity),
        )
        .route("/routes", get(routes::list_routes).post(routes::create_route))
        .route(
            "/routes/{route_id}",
            get(routes::get_route)
                .put(routes::update_route)
                .delete(routes::delete_route),
        )
        .route("/routes/{route_id}/summary", get(routes::get_route_summary))
        .route(
            "/routes/{route_id}/points",
            get(points::list_points).post(points::add_points),
        )
        .route(
            "/routes/{route_id}/points/{point_id}",
            delete(points::delete_point),
        )
}

/// Parse a path identifier, reporting which one was malformed
pub(crate) fn parse_id(value: &str, name: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value)
        .map_err(|_| ApiError::bad_request(format!("Invalid {}: '{}'", name, value)).with_code("invalid_id"))
}
