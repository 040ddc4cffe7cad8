//! Tracking domain - activities, GPS routes and their coordinate points

mod activity;
mod point;
mod route;
mod summary;
mod validation;

pub use activity::{average_speed_kmh, Activity};
pub use point::Point;
pub use route::Route;
pub use summary::{haversine_distance, summarize, TrackSummary};
pub use validation::{
    validate_coordinates, validate_label, validate_measurement, TrackingValidationError,
};
