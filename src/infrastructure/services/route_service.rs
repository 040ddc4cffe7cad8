//! Route service - GPS routes and their coordinate points

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::storage::{RecordFilter, TableStore};
use crate::domain::tracking::summarize;
use crate::domain::{DomainError, Point, Route, TrackSummary};

/// A coordinate submitted for a route
#[derive(Debug, Clone)]
pub struct NewPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
    pub speed_ms: Option<f64>,
}

/// Route service; routes are owned by a user and points by their route
#[derive(Debug, Clone)]
pub struct RouteService {
    routes: Arc<dyn TableStore<Route>>,
    points: Arc<dyn TableStore<Point>>,
}

impl RouteService {
    pub fn new(routes: Arc<dyn TableStore<Route>>, points: Arc<dyn TableStore<Point>>) -> Self {
        Self { routes, points }
    }

    /// List the user's routes, oldest first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Route>, DomainError> {
        self.routes
            .list(&RecordFilter::new().eq("user_id", user_id).order_by("created_at"))
            .await
    }

    /// Get one of the user's routes
    pub async fn get(&self, user_id: &str, id: &Uuid) -> Result<Route, DomainError> {
        self.routes
            .get(id)
            .await?
            .filter(|route| route.is_owned_by(user_id))
            .ok_or_else(|| DomainError::not_found(format!("Route '{}' not found", id)))
    }

    pub async fn create(&self, user_id: &str, name: String) -> Result<Route, DomainError> {
        let route = Route::new(user_id, name);
        route.validate()?;

        self.routes.insert(route).await
    }

    /// Rename a route
    pub async fn rename(&self, user_id: &str, id: &Uuid, name: String) -> Result<Route, DomainError> {
        let mut route = self.get(user_id, id).await?;
        route.name = name;
        route.validate()?;

        self.routes.update(route).await
    }

    /// Delete a route together with its points
    pub async fn delete(&self, user_id: &str, id: &Uuid) -> Result<(), DomainError> {
        let route = self.get(user_id, id).await?;

        let removed = self
            .points
            .delete_matching(&RecordFilter::new().eq("route_id", route.id))
            .await?;

        if !self.routes.delete(&route.id).await? {
            return Err(DomainError::not_found(format!("Route '{}' not found", id)));
        }

        info!(route_id = %route.id, points = removed, "Deleted route");
        Ok(())
    }

    /// Points of a route in recording order
    pub async fn list_points(&self, user_id: &str, route_id: &Uuid) -> Result<Vec<Point>, DomainError> {
        let route = self.get(user_id, route_id).await?;

        self.points
            .list(
                &RecordFilter::new()
                    .eq("route_id", route.id)
                    .order_by("recorded_at"),
            )
            .await
    }

    /// Append a batch of points; the whole batch is rejected if any point is invalid
    pub async fn add_points(
        &self,
        user_id: &str,
        route_id: &Uuid,
        batch: Vec<NewPoint>,
    ) -> Result<Vec<Point>, DomainError> {
        let route = self.get(user_id, route_id).await?;

        if batch.is_empty() {
            return Err(DomainError::validation("At least one point is required"));
        }

        let mut points = Vec::with_capacity(batch.len());

        for new_point in batch {
            let mut point = Point::new(
                route.id,
                new_point.latitude,
                new_point.longitude,
                new_point.recorded_at,
            );
            point.speed_ms = new_point.speed_ms;
            point.validate()?;
            points.push(point);
        }

        debug!(route_id = %route.id, count = points.len(), "Adding points");
        self.points.insert_many(points).await
    }

    /// Delete a single point of a route
    pub async fn delete_point(
        &self,
        user_id: &str,
        route_id: &Uuid,
        point_id: &Uuid,
    ) -> Result<(), DomainError> {
        let route = self.get(user_id, route_id).await?;

        let belongs = self
            .points
            .get(point_id)
            .await?
            .is_some_and(|point| point.route_id == route.id);

        if !belongs || !self.points.delete(point_id).await? {
            return Err(DomainError::not_found(format!("Point '{}' not found", point_id)));
        }

        Ok(())
    }

    /// Distance, duration and average speed of a route
    pub async fn summary(&self, user_id: &str, route_id: &Uuid) -> Result<TrackSummary, DomainError> {
        let points = self.list_points(user_id, route_id).await?;
        Ok(summarize(&points))
    }
}
