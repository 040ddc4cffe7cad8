//! Hosted table store backed by the PostgREST table API

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::storage::{Record, RecordFilter, TableStore};
use crate::domain::DomainError;

/// Connection settings for the hosted table API
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project base URL; tables live under `<base>/rest/v1`
    pub base_url: String,
    /// Service credential sent as `apikey` and bearer token
    pub api_key: String,
    pub request_timeout: Duration,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn rest_root(&self) -> String {
        format!("{}/rest/v1", self.base_url.trim_end_matches('/'))
    }
}

/// Shared HTTP client for all tables of one project
#[derive(Clone)]
pub struct RestClient {
    rest_root: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("rest_root", &self.rest_root)
            .field("api_key", &"[hidden]")
            .finish()
    }
}

impl RestClient {
    pub fn new(config: &RestConfig) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            rest_root: config.rest_root(),
            api_key: config.api_key.clone(),
            http_client,
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}/{}", self.rest_root, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Table store for one record type, speaking PostgREST conventions
#[derive(Debug, Clone)]
pub struct RestTableStore<R>
where
    R: Record,
{
    client: RestClient,
    _phantom: PhantomData<R>,
}

impl<R> RestTableStore<R>
where
    R: Record,
{
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            _phantom: PhantomData,
        }
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client.request(method, R::TABLE)
    }
}

/// PostgREST query pairs for a filter
fn filter_query(filter: &RecordFilter) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = filter
        .conditions()
        .iter()
        .map(|(column, value)| (column.clone(), format!("eq.{}", value)))
        .collect();

    if let Some(column) = filter.ordering() {
        query.push(("order".to_string(), format!("{}.asc", column)));
    }

    if let Some(limit) = filter.max_rows() {
        query.push(("limit".to_string(), limit.to_string()));
    }

    query
}

fn id_query(id: &Uuid) -> [(&'static str, String); 1] {
    [("id", format!("eq.{}", id))]
}

async fn send(table: &str, request: RequestBuilder) -> Result<Response, DomainError> {
    let response = request
        .send()
        .await
        .map_err(|e| DomainError::storage(format!("Request to '{}' failed: {}", table, e)))?;

    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::CONFLICT {
        return Err(DomainError::conflict(format!("'{}': {}", table, body)));
    }

    Err(DomainError::upstream(
        status.as_u16(),
        format!("Table '{}' request rejected: {}", table, body),
    ))
}

async fn read_rows<T: DeserializeOwned>(table: &str, response: Response) -> Result<Vec<T>, DomainError> {
    response
        .json::<Vec<T>>()
        .await
        .map_err(|e| DomainError::storage(format!("Invalid rows from '{}': {}", table, e)))
}

#[async_trait]
impl<R> TableStore<R> for RestTableStore<R>
where
    R: Record + 'static,
{
    async fn insert(&self, record: R) -> Result<R, DomainError> {
        let id = record.id();
        let mut rows = self.insert_many(vec![record]).await?;

        rows.pop().ok_or_else(|| {
            DomainError::storage(format!("Insert of '{}' into '{}' returned no row", id, R::TABLE))
        })
    }

    async fn insert_many(&self, records: Vec<R>) -> Result<Vec<R>, DomainError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let request = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&records);

        let response = send(R::TABLE, request).await?;
        read_rows(R::TABLE, response).await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<R>, DomainError> {
        let request = self
            .request(Method::GET)
            .query(&id_query(id))
            .query(&[("select", "*")]);

        let response = send(R::TABLE, request).await?;
        let mut rows: Vec<R> = read_rows(R::TABLE, response).await?;

        Ok(rows.pop())
    }

    async fn list(&self, filter: &RecordFilter) -> Result<Vec<R>, DomainError> {
        let request = self
            .request(Method::GET)
            .query(&[("select", "*")])
            .query(&filter_query(filter));

        let response = send(R::TABLE, request).await?;
        read_rows(R::TABLE, response).await
    }

    async fn update(&self, record: R) -> Result<R, DomainError> {
        let id = record.id();
        let request = self
            .request(Method::PATCH)
            .query(&id_query(&id))
            .header("Prefer", "return=representation")
            .json(&record);

        let response = send(R::TABLE, request).await?;
        let mut rows: Vec<R> = read_rows(R::TABLE, response).await?;

        rows.pop().ok_or_else(|| {
            DomainError::not_found(format!("Row '{}' not found in '{}'", id, R::TABLE))
        })
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let request = self
            .request(Method::DELETE)
            .query(&id_query(id))
            .header("Prefer", "return=representation");

        let response = send(R::TABLE, request).await?;
        let rows: Vec<Value> = read_rows(R::TABLE, response).await?;

        Ok(!rows.is_empty())
    }

    async fn delete_matching(&self, filter: &RecordFilter) -> Result<usize, DomainError> {
        if filter.conditions().is_empty() {
            return Err(DomainError::validation(format!(
                "Refusing to delete every row of '{}'",
                R::TABLE
            )));
        }

        let request = self
            .request(Method::DELETE)
            .query(&filter_query(filter))
            .header("Prefer", "return=representation");

        let response = send(R::TABLE, request).await?;
        let rows: Vec<Value> = read_rows(R::TABLE, response).await?;

        Ok(rows.len())
    }
}
