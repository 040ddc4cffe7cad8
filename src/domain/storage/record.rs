//! Table record traits and query filters

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// A row persisted in one of the hosted database tables
pub trait Record: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// Name of the backing table
    const TABLE: &'static str;

    /// Primary key of the row
    fn id(&self) -> Uuid;
}

/// Equality filter over table columns, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    conditions: Vec<(String, String)>,
    order_by: Option<String>,
    limit: Option<usize>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match rows whose `column` equals `value`
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.conditions.push((column.into(), value.to_string()));
        self
    }

    /// Sort ascending by `column`
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    pub fn ordering(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn max_rows(&self) -> Option<usize> {
        self.limit
    }
}
