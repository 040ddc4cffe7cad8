//! Table store trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::DomainError;

use super::record::{Record, RecordFilter};

/// CRUD operations against a single hosted table
#[async_trait]
pub trait TableStore<R>: Send + Sync + Debug
where
    R: Record + 'static,
{
    /// Inserts a row and returns it as stored
    async fn insert(&self, record: R) -> Result<R, DomainError>;

    /// Inserts several rows at once
    async fn insert_many(&self, records: Vec<R>) -> Result<Vec<R>, DomainError> {
        let mut inserted = Vec::with_capacity(records.len());

        for record in records {
            inserted.push(self.insert(record).await?);
        }

        Ok(inserted)
    }

    /// Retrieves a row by primary key
    async fn get(&self, id: &Uuid) -> Result<Option<R>, DomainError>;

    /// Retrieves all rows matching the filter
    async fn list(&self, filter: &RecordFilter) -> Result<Vec<R>, DomainError>;

    /// Replaces an existing row, returns error if not found
    async fn update(&self, record: R) -> Result<R, DomainError>;

    /// Deletes a row by primary key, returns true if deleted
    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError>;

    /// Deletes every row matching the filter, returns the number removed
    async fn delete_matching(&self, filter: &RecordFilter) -> Result<usize, DomainError>;
}
