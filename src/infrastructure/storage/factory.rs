//! Table store factory for runtime backend selection

use std::sync::Arc;

use tracing::warn;

use crate::domain::storage::{Record, TableStore};
use crate::domain::tracking::{Activity, Point, Route};
use crate::domain::DomainError;

use super::in_memory::InMemoryTableStore;
use super::rest::{RestClient, RestConfig, RestTableStore};

/// Table backend configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory tables (for testing/development)
    InMemory,
    /// Hosted tables behind the PostgREST API
    Rest(RestConfig),
}

/// The three application tables
#[derive(Debug, Clone)]
pub struct TableStores {
    pub activities: Arc<dyn TableStore<Activity>>,
    pub routes: Arc<dyn TableStore<Route>>,
    pub points: Arc<dyn TableStore<Point>>,
}

impl TableStores {
    /// In-memory tables
    pub fn in_memory() -> Self {
        Self {
            activities: Arc::new(InMemoryTableStore::new()),
            routes: Arc::new(InMemoryTableStore::new()),
            points: Arc::new(InMemoryTableStore::new()),
        }
    }
}

/// Factory for creating table stores
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates all application tables for the configured backend
    pub fn create(config: &StorageConfig) -> Result<TableStores, DomainError> {
        match config {
            StorageConfig::InMemory => {
                warn!("Using in-memory tables; data is lost on restart");
                Ok(TableStores::in_memory())
            }
            StorageConfig::Rest(rest) => {
                let client = RestClient::new(rest)?;

                Ok(TableStores {
                    activities: rest_table::<Activity>(&client),
                    routes: rest_table::<Route>(&client),
                    points: rest_table::<Point>(&client),
                })
            }
        }
    }
}

fn rest_table<R: Record + 'static>(client: &RestClient) -> Arc<dyn TableStore<R>> {
    Arc::new(RestTableStore::<R>::new(client.clone()))
}
