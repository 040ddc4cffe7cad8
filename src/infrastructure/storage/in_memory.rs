//! In-memory table store implementation

use std::cmp::Ordering;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::storage::{Record, RecordFilter, TableStore};
use crate::domain::DomainError;

/// Thread-safe in-memory table
///
/// Useful for testing and local development. Rows keep insertion order and
/// are lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryTableStore<R>
where
    R: Record,
{
    rows: RwLock<Vec<R>>,
}

impl<R> Default for InMemoryTableStore<R>
where
    R: Record,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemoryTableStore<R>
where
    R: Record,
{
    /// Creates a new empty table
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Creates a table pre-populated with rows
    pub fn with_rows(rows: Vec<R>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

fn lock_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::storage(format!("Failed to acquire table lock: {}", e))
}

fn to_row_value<R: Record>(record: &R) -> Result<Value, DomainError> {
    serde_json::to_value(record)
        .map_err(|e| DomainError::storage(format!("Failed to serialize row: {}", e)))
}

/// Textual form of a column, as PostgREST compares it in `eq.` filters
fn column_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_columns(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => column_text(a).cmp(&column_text(b)),
    }
}

fn matches_filter(row: &Value, filter: &RecordFilter) -> bool {
    filter.conditions().iter().all(|(column, expected)| {
        row.get(column)
            .map(|actual| column_text(actual) == *expected)
            .unwrap_or(false)
    })
}

#[async_trait]
impl<R> TableStore<R> for InMemoryTableStore<R>
where
    R: Record + 'static,
{
    async fn insert(&self, record: R) -> Result<R, DomainError> {
        let mut rows = self.rows.write().map_err(lock_error)?;

        if rows.iter().any(|row| row.id() == record.id()) {
            return Err(DomainError::conflict(format!(
                "Row '{}' already exists in '{}'",
                record.id(),
                R::TABLE
            )));
        }

        rows.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<R>, DomainError> {
        let rows = self.rows.read().map_err(lock_error)?;

        Ok(rows.iter().find(|row| row.id() == *id).cloned())
    }

    async fn list(&self, filter: &RecordFilter) -> Result<Vec<R>, DomainError> {
        let rows = self.rows.read().map_err(lock_error)?;

        let mut matched = Vec::new();

        for row in rows.iter() {
            let value = to_row_value(row)?;

            if matches_filter(&value, filter) {
                matched.push((value, row.clone()));
            }
        }

        if let Some(column) = filter.ordering() {
            matched.sort_by(|(a, _), (b, _)| {
                compare_columns(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                )
            });
        }

        let mut result: Vec<R> = matched.into_iter().map(|(_, row)| row).collect();

        if let Some(limit) = filter.max_rows() {
            result.truncate(limit);
        }

        Ok(result)
    }

    async fn update(&self, record: R) -> Result<R, DomainError> {
        let mut rows = self.rows.write().map_err(lock_error)?;

        let slot = rows
            .iter_mut()
            .find(|row| row.id() == record.id())
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Row '{}' not found in '{}'",
                    record.id(),
                    R::TABLE
                ))
            })?;

        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let mut rows = self.rows.write().map_err(lock_error)?;
        let before = rows.len();

        rows.retain(|row| row.id() != *id);
        Ok(rows.len() < before)
    }

    async fn delete_matching(&self, filter: &RecordFilter) -> Result<usize, DomainError> {
        let mut rows = self.rows.write().map_err(lock_error)?;
        let mut kept = Vec::with_capacity(rows.len());
        let mut removed = 0;

        for row in rows.drain(..) {
            if matches_filter(&to_row_value(&row)?, filter) {
                removed += 1;
            } else {
                kept.push(row);
            }
        }

        *rows = kept;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tracking::{Point, Route};
    use chrono::{Duration, Utc};

    fn route(user: &str, name: &str) -> Route {
        Route::new(user, name)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store: InMemoryTableStore<Route> = InMemoryTableStore::new();
        let r = route("user-1", "Lake loop");

        store.insert(r.clone()).await.unwrap();

        let result = store.get(&r.id).await.unwrap();
        assert_eq!(result, Some(r));
    }

    #[tokio::test]
    async fn test_insert_conflict() {
        let store: InMemoryTableStore<Route> = InMemoryTableStore::new();
        let r = route("user-1", "Lake loop");

        store.insert(r.clone()).await.unwrap();
        let result = store.insert(r).await;

        assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update() {
        let store: InMemoryTableStore<Route> = InMemoryTableStore::new();
        let mut r = route("user-1", "Lake loop");
        store.insert(r.clone()).await.unwrap();

        r.name = "Lake loop (long)".to_string();
        store.update(r.clone()).await.unwrap();

        let result = store.get(&r.id).await.unwrap().unwrap();
        assert_eq!(result.name, "Lake loop (long)");
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let store: InMemoryTableStore<Route> = InMemoryTableStore::new();
        let result = store.update(route("user-1", "Ghost")).await;

        assert!(matches!(result.unwrap_err(), DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let store: InMemoryTableStore<Route> = InMemoryTableStore::new();
        let r = route("user-1", "Lake loop");
        store.insert(r.clone()).await.unwrap();

        assert!(store.delete(&r.id).await.unwrap());
        assert!(!store.delete(&r.id).await.unwrap());
        assert!(store.get(&r.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_column() {
        let store = InMemoryTableStore::with_rows(vec![
            route("user-1", "A"),
            route("user-2", "B"),
            route("user-1", "C"),
        ]);

        let rows = store
            .list(&RecordFilter::new().eq("user_id", "user-1"))
            .await
            .unwrap();

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_list_orders_and_limits() {
        let route_id = uuid::Uuid::new_v4();
        let start = Utc::now();
        let store = InMemoryTableStore::with_rows(vec![
            Point::new(route_id, 3.0, 0.0, start + Duration::seconds(20)),
            Point::new(route_id, 1.0, 0.0, start),
            Point::new(route_id, 2.0, 0.0, start + Duration::seconds(10)),
            Point::new(uuid::Uuid::new_v4(), 9.0, 0.0, start),
        ]);

        let rows = store
            .list(
                &RecordFilter::new()
                    .eq("route_id", route_id)
                    .order_by("latitude")
                    .limit(2),
            )
            .await
            .unwrap();

        let lats: Vec<f64> = rows.iter().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_delete_matching() {
        let route_id = uuid::Uuid::new_v4();
        let other = uuid::Uuid::new_v4();
        let now = Utc::now();
        let store = InMemoryTableStore::with_rows(vec![
            Point::new(route_id, 1.0, 0.0, now),
            Point::new(route_id, 2.0, 0.0, now),
            Point::new(other, 3.0, 0.0, now),
        ]);

        let removed = store
            .delete_matching(&RecordFilter::new().eq("route_id", route_id))
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.list(&RecordFilter::new()).await.unwrap().len(), 1);
    }
}
