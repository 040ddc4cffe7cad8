//! Activity endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Activity;
use crate::infrastructure::services::{CreateActivityRequest, UpdateActivityRequest};

use super::parse_id;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivityApiRequest {
    pub title: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    pub route_id: Option<Uuid>,
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default)]
    pub distance_meters: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateActivityApiRequest {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub route_id: Option<Uuid>,
    pub duration_seconds: Option<f64>,
    pub distance_meters: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListActivitiesResponse {
    pub activities: Vec<Activity>,
    pub total: usize,
}

/// GET /v1/activities
pub async fn list_activities(
    State(state): State<AppState>,
    user: RequireUser,
) -> Result<Json<ListActivitiesResponse>, ApiError> {
    let activities = state.activity_service.list(user.user_id()).await?;
    let total = activities.len();

    Ok(Json(ListActivitiesResponse { activities, total }))
}

/// POST /v1/activities
pub async fn create_activity(
    State(state): State<AppState>,
    user: RequireUser,
    Json(request): Json<CreateActivityApiRequest>,
) -> Result<(StatusCode, Json<Activity>), ApiError> {
    debug!(title = %request.title, "Creating activity");

    let activity = state
        .activity_service
        .create(
            user.user_id(),
            CreateActivityRequest {
                title: request.title,
                date: request.date,
                route_id: request.route_id,
                duration_seconds: request.duration_seconds,
                distance_meters: request.distance_meters,
                latitude: request.latitude,
                longitude: request.longitude,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(activity)))
}

/// GET /v1/activities/{activity_id}
pub async fn get_activity(
    State(state): State<AppState>,
    user: RequireUser,
    Path(activity_id): Path<String>,
) -> Result<Json<Activity>, ApiError> {
    let id = parse_id(&activity_id, "activity id")?;
    let activity = state.activity_service.get(user.user_id(), &id).await?;

    Ok(Json(activity))
}

/// PUT /v1/activities/{activity_id}
pub async fn update_activity(
    State(state): State<AppState>,
    user: RequireUser,
    Path(activity_id): Path<String>,
    Json(request): Json<UpdateActivityApiRequest>,
) -> Result<Json<Activity>, ApiError> {
    let id = parse_id(&activity_id, "activity id")?;
    debug!(activity_id = %id, "Updating activity");

    let activity = state
        .activity_service
        .update(
            user.user_id(),
            &id,
            UpdateActivityRequest {
                title: request.title,
                date: request.date,
                route_id: request.route_id,
                duration_seconds: request.duration_seconds,
                distance_meters: request.distance_meters,
                latitude: request.latitude,
                longitude: request.longitude,
            },
        )
        .await?;

    Ok(Json(activity))
}

/// DELETE /v1/activities/{activity_id}
pub async fn delete_activity(
    State(state): State<AppState>,
    user: RequireUser,
    Path(activity_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&activity_id, "activity id")?;
    state.activity_service.delete(user.user_id(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
