//! GPS route endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Route, TrackSummary};

use super::parse_id;

/// Body for creating or renaming a route
#[derive(Debug, Clone, Deserialize)]
pub struct RouteApiRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRoutesResponse {
    pub routes: Vec<Route>,
    pub total: usize,
}

pub async fn list_routes(
    State(state): State<AppState>,
    user: RequireUser,
) -> Result<Json<ListRoutesResponse>, ApiError> {
    let routes = state.route_service.list(user.user_id()).await?;
    let total = routes.len();

    Ok(Json(ListRoutesResponse { routes, total }))
}

pub async fn create_route(
    State(state): State<AppState>,
    user: RequireUser,
    Json(request): Json<RouteApiRequest>,
) -> Result<(StatusCode, Json<Route>), ApiError> {
    debug!(name = %request.name, "Creating route");

    let route = state
        .route_service
        .create(user.user_id(), request.name)
        .await?;

    Ok((StatusCode::CREATED, Json(route)))
}

pub async fn get_route(
    State(state): State<AppState>,
    user: RequireUser,
    Path(route_id): Path<String>,
) -> Result<Json<Route>, ApiError> {
    let id = parse_id(&route_id, "route id")?;

    Ok(Json(state.route_service.get(user.user_id(), &id).await?))
}

pub async fn update_route(
    State(state): State<AppState>,
    user: RequireUser,
    Path(route_id): Path<String>,
    Json(request): Json<RouteApiRequest>,
) -> Result<Json<Route>, ApiError> {
    let id = parse_id(&route_id, "route id")?;

    let route = state
        .route_service
        .rename(user.user_id(), &id, request.name)
        .await?;

    Ok(Json(route))
}

/// DELETE /v1/routes/{route_id}; removes the route's points as well
pub async fn delete_route(
    State(state): State<AppState>,
    user: RequireUser,
    Path(route_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&route_id, "route id")?;
    state.route_service.delete(user.user_id(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/routes/{route_id}/summary
pub async fn get_route_summary(
    State(state): State<AppState>,
    user: RequireUser,
    Path(route_id): Path<String>,
) -> Result<Json<TrackSummary>, ApiError> {
    let id = parse_id(&route_id, "route id")?;

    Ok(Json(state.route_service.summary(user.user_id(), &id).await?))
}
