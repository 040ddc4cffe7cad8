//! Storage infrastructure - Table store implementations

mod factory;
mod in_memory;
mod rest;

pub use factory::{StorageConfig, StorageFactory, TableStores};
pub use in_memory::InMemoryTableStore;
pub use rest::{RestClient, RestConfig, RestTableStore};
