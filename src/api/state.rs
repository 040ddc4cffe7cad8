//! Application state for shared services

use std::sync::Arc;

use crate::domain::{IdentityClient, TokenVerifier};
use crate::infrastructure::services::{ActivityService, RouteService};
use crate::infrastructure::storage::TableStores;

/// Application state shared by all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub identity: Arc<dyn IdentityClient>,
    pub activity_service: Arc<ActivityService>,
    pub route_service: Arc<RouteService>,
}

impl AppState {
    /// Wire the services over a set of tables
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        identity: Arc<dyn IdentityClient>,
        tables: TableStores,
    ) -> Self {
        Self {
            verifier,
            identity,
            activity_service: Arc::new(ActivityService::new(
                tables.activities,
                tables.routes.clone(),
            )),
            route_service: Arc::new(RouteService::new(tables.routes, tables.points)),
        }
    }
}
