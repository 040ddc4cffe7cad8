//! Activity entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    validate_coordinates, validate_label, validate_measurement, TrackingValidationError,
};
use crate::domain::storage::Record;

/// A recorded drive or workout belonging to one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub route_id: Option<Uuid>,
    pub duration_seconds: f64,
    pub distance_meters: f64,
    pub average_speed_kmh: f64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Activity {
    /// Create a new activity with a fresh identifier
    pub fn new(user_id: impl Into<String>, title: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            title: title.into(),
            date,
            route_id: None,
            duration_seconds: 0.0,
            distance_meters: 0.0,
            average_speed_kmh: 0.0,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_route(mut self, route_id: Uuid) -> Self {
        self.route_id = Some(route_id);
        self
    }

    pub fn with_metrics(mut self, duration_seconds: f64, distance_meters: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self.distance_meters = distance_meters;
        self.average_speed_kmh = average_speed_kmh(distance_meters, duration_seconds);
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Check all field invariants
    pub fn validate(&self) -> Result<(), TrackingValidationError> {
        validate_label("title", &self.title)?;
        validate_measurement("duration_seconds", self.duration_seconds)?;
        validate_measurement("distance_meters", self.distance_meters)?;
        validate_measurement("average_speed_kmh", self.average_speed_kmh)?;

        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => validate_coordinates(lat, lon),
            (Some(lat), None) => validate_coordinates(lat, 0.0),
            (None, Some(lon)) => validate_coordinates(0.0, lon),
            (None, None) => Ok(()),
        }
    }
}

impl Record for Activity {
    const TABLE: &'static str = "activities";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Average speed in km/h for a distance in meters covered in `duration_seconds`
pub fn average_speed_kmh(distance_meters: f64, duration_seconds: f64) -> f64 {
    if duration_seconds <= 0.0 {
        return 0.0;
    }

    (distance_meters / duration_seconds) * 3.6
}
