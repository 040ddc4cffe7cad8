//! Route point endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Point;
use crate::infrastructure::services::NewPoint;

use super::parse_id;

#[derive(Debug, Clone, Deserialize)]
pub struct PointApiRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
    pub speed_ms: Option<f64>,
}

/// Batch of points to append
#[derive(Debug, Clone, Deserialize)]
pub struct AddPointsApiRequest {
    pub points: Vec<PointApiRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListPointsResponse {
    pub points: Vec<Point>,
    pub total: usize,
}

impl From<PointApiRequest> for NewPoint {
    fn from(request: PointApiRequest) -> Self {
        Self {
            latitude: request.latitude,
            longitude: request.longitude,
            recorded_at: request.recorded_at,
            speed_ms: request.speed_ms,
        }
    }
}

/// GET /v1/routes/{route_id}/points
pub async fn list_points(
    State(state): State<AppState>,
    user: RequireUser,
    Path(route_id): Path<String>,
) -> Result<Json<ListPointsResponse>, ApiError> {
    let id = parse_id(&route_id, "route id")?;
    let points = state.route_service.list_points(user.user_id(), &id).await?;
    let total = points.len();

    Ok(Json(ListPointsResponse { points, total }))
}

/// POST /v1/routes/{route_id}/points
pub async fn add_points(
    State(state): State<AppState>,
    user: RequireUser,
    Path(route_id): Path<String>,
    Json(request): Json<AddPointsApiRequest>,
) -> Result<(StatusCode, Json<ListPointsResponse>), ApiError> {
    let id = parse_id(&route_id, "route id")?;
    let batch = request.points.into_iter().map(NewPoint::from).collect();

    let points = state
        .route_service
        .add_points(user.user_id(), &id, batch)
        .await?;
    let total = points.len();

    Ok((StatusCode::CREATED, Json(ListPointsResponse { points, total })))
}

/// DELETE /v1/routes/{route_id}/points/{point_id}
pub async fn delete_point(
    State(state): State<AppState>,
    user: RequireUser,
    Path((route_id, point_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let route_id = parse_id(&route_id, "route id")?;
    let point_id = parse_id(&point_id, "point id")?;

    state
        .route_service
        .delete_point(user.user_id(), &route_id, &point_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
