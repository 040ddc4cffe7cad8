//! Infrastructure services

mod activity_service;
mod route_service;

pub use activity_service::{ActivityService, CreateActivityRequest, UpdateActivityRequest};
pub use route_service::{NewPoint, RouteService};
