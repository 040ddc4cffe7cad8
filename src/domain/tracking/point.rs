//! Coordinate point entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_coordinates, validate_measurement, TrackingValidationError};
use crate::domain::storage::Record;

/// A single GPS fix recorded along a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: Uuid,
    pub route_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
    /// Instantaneous speed reported by the device, in m/s
    #[serde(default)]
    pub speed_ms: Option<f64>,
}

impl Point {
    pub fn new(route_id: Uuid, latitude: f64, longitude: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id,
            latitude,
            longitude,
            recorded_at,
            speed_ms: None,
        }
    }

    pub fn with_speed(mut self, speed_ms: f64) -> Self {
        self.speed_ms = Some(speed_ms);
        self
    }

    pub fn validate(&self) -> Result<(), TrackingValidationError> {
        validate_coordinates(self.latitude, self.longitude)?;

        if let Some(speed) = self.speed_ms {
            validate_measurement("speed_ms", speed)?;
        }

        Ok(())
    }
}

impl Record for Point {
    const TABLE: &'static str = "points";

    fn id(&self) -> Uuid {
        self.id
    }
}
