//! Activity service - per-user CRUD over the activities table

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::domain::storage::{RecordFilter, TableStore};
use crate::domain::tracking::average_speed_kmh;
use crate::domain::{Activity, DomainError, Route};

/// Request to record a new activity
#[derive(Debug, Clone)]
pub struct CreateActivityRequest {
    pub title: String,
    pub date: DateTime<Utc>,
    pub route_id: Option<Uuid>,
    pub duration_seconds: f64,
    pub distance_meters: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Request to update an existing activity
#[derive(Debug, Clone, Default)]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub route_id: Option<Uuid>,
    pub duration_seconds: Option<f64>,
    pub distance_meters: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Activity service; every operation is scoped to the calling user
#[derive(Debug, Clone)]
pub struct ActivityService {
    activities: Arc<dyn TableStore<Activity>>,
    routes: Arc<dyn TableStore<Route>>,
}

impl ActivityService {
    pub fn new(
        activities: Arc<dyn TableStore<Activity>>,
        routes: Arc<dyn TableStore<Route>>,
    ) -> Self {
        Self { activities, routes }
    }

    /// List the user's activities, oldest first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Activity>, DomainError> {
        self.activities
            .list(&RecordFilter::new().eq("user_id", user_id).order_by("date"))
            .await
    }

    /// Get one of the user's activities
    pub async fn get(&self, user_id: &str, id: &Uuid) -> Result<Activity, DomainError> {
        self.activities
            .get(id)
            .await?
            .filter(|activity| activity.is_owned_by(user_id))
            .ok_or_else(|| DomainError::not_found(format!("Activity '{}' not found", id)))
    }

    /// Record a new activity
    pub async fn create(
        &self,
        user_id: &str,
        request: CreateActivityRequest,
    ) -> Result<Activity, DomainError> {
        let mut activity = Activity::new(user_id, request.title, request.date)
            .with_metrics(request.duration_seconds, request.distance_meters);

        if let Some(route_id) = request.route_id {
            self.ensure_route(user_id, &route_id).await?;
            activity = activity.with_route(route_id);
        }

        activity.latitude = request.latitude;
        activity.longitude = request.longitude;

        activity.validate()?;

        debug!(activity_id = %activity.id, "Recording activity");
        self.activities.insert(activity).await
    }

    /// Update an existing activity; the average speed follows the metrics
    pub async fn update(
        &self,
        user_id: &str,
        id: &Uuid,
        request: UpdateActivityRequest,
    ) -> Result<Activity, DomainError> {
        let mut activity = self.get(user_id, id).await?;

        if let Some(title) = request.title {
            activity.title = title;
        }

        if let Some(date) = request.date {
            activity.date = date;
        }

        if let Some(route_id) = request.route_id {
            self.ensure_route(user_id, &route_id).await?;
            activity.route_id = Some(route_id);
        }

        if let Some(duration) = request.duration_seconds {
            activity.duration_seconds = duration;
        }

        if let Some(distance) = request.distance_meters {
            activity.distance_meters = distance;
        }

        if request.latitude.is_some() {
            activity.latitude = request.latitude;
        }

        if request.longitude.is_some() {
            activity.longitude = request.longitude;
        }

        activity.average_speed_kmh =
            average_speed_kmh(activity.distance_meters, activity.duration_seconds);
        activity.validate()?;

        self.activities.update(activity).await
    }

    /// Delete one of the user's activities
    pub async fn delete(&self, user_id: &str, id: &Uuid) -> Result<(), DomainError> {
        let activity = self.get(user_id, id).await?;

        if !self.activities.delete(&activity.id).await? {
            return Err(DomainError::not_found(format!("Activity '{}' not found", id)));
        }

        Ok(())
    }

    async fn ensure_route(&self, user_id: &str, route_id: &Uuid) -> Result<(), DomainError> {
        let owned = self
            .routes
            .get(route_id)
            .await?
            .is_some_and(|route| route.is_owned_by(user_id));

        if !owned {
            return Err(DomainError::validation(format!(
                "Route '{}' does not exist",
                route_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryTableStore;

    fn create_service() -> (ActivityService, Arc<InMemoryTableStore<Route>>) {
        let routes = Arc::new(InMemoryTableStore::new());
        let service = ActivityService::new(Arc::new(InMemoryTableStore::new()), routes.clone());
        (service, routes)
    }

    fn create_request(title: &str) -> CreateActivityRequest {
        CreateActivityRequest {
            title: title.to_string(),
            date: Utc::now(),
            route_id: None,
            duration_seconds: 1800.0,
            distance_meters: 9000.0,
            latitude: None,
            longitude: None,
        }
    }

    #[tokio::test]
    async fn test_create_computes_average_speed() {
        let (service, _) = create_service();

        let activity = service.create("user-1", create_request("Ride")).await.unwrap();

        assert_eq!(activity.user_id, "user-1");
        assert!((activity.average_speed_kmh - 18.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let (service, _) = create_service();

        let mut request = create_request("");
        let result = service.create("user-1", request.clone()).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        request.title = "Ride".to_string();
        request.latitude = Some(120.0);
        request.longitude = Some(0.0);
        let result = service.create("user-1", request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_requires_owned_route() {
        let (service, routes) = create_service();
        let foreign = routes.insert(Route::new("user-2", "Theirs")).await.unwrap();
        let own = routes.insert(Route::new("user-1", "Mine")).await.unwrap();

        let mut request = create_request("Ride");
        request.route_id = Some(foreign.id);
        assert!(service.create("user-1", request.clone()).await.is_err());

        request.route_id = Some(own.id);
        let activity = service.create("user-1", request).await.unwrap();
        assert_eq!(activity.route_id, Some(own.id));
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_owner() {
        let (service, _) = create_service();
        let mine = service.create("user-1", create_request("Mine")).await.unwrap();
        service.create("user-2", create_request("Theirs")).await.unwrap();

        let listed = service.list("user-1").await.unwrap();
        assert_eq!(listed, vec![mine.clone()]);

        let result = service.get("user-2", &mine.id).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let result = service.delete("user-2", &mine.id).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_recomputes_speed() {
        let (service, _) = create_service();
        let activity = service.create("user-1", create_request("Ride")).await.unwrap();

        let updated = service
            .update(
                "user-1",
                &activity.id,
                UpdateActivityRequest {
                    title: Some("Long ride".to_string()),
                    duration_seconds: Some(3600.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Long ride");
        assert!((updated.average_speed_kmh - 9.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, _) = create_service();
        let activity = service.create("user-1", create_request("Ride")).await.unwrap();

        service.delete("user-1", &activity.id).await.unwrap();

        assert!(service.list("user-1").await.unwrap().is_empty());
    }
}
