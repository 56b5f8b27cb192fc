//! Generic resource accessor over the dispatcher.
//!
//! One descriptor per entity collection replaces per-endpoint wrapper
//! methods: the path stem plus the shared request primitive covers
//! list, get, create, replace, patch and delete for any entity.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::client::{AuxoClient, Verb};
use super::constants;
use super::envelope::ApiResponse;
use super::error::ApiError;
use super::query::QueryOptions;

/// Descriptor for one entity collection exposed by the service,
/// e.g. `Resource::new("paymentPlans")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    path: &'static str,
}

impl Resource {
    pub const fn new(path: &'static str) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    /// List records, passing the pagination envelope through.
    pub async fn list<T: DeserializeOwned>(
        &self,
        client: &AuxoClient,
        options: &QueryOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        let mut path = constants::collection_path(self.path);
        let query = options.to_query_string()?;
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }
        client.fetch_list(&path).await
    }

    /// Fetch a single record by id.
    pub async fn get(&self, client: &AuxoClient, id: &str) -> Result<Value, ApiError> {
        client.get(&constants::record_path(self.path, id)).await
    }

    /// Fetch a single record by id, deserialized into `T`.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        client: &AuxoClient,
        id: &str,
    ) -> Result<T, ApiError> {
        client
            .request_as(Verb::Get, &constants::record_path(self.path, id), None)
            .await
    }

    /// Create a new record.
    pub async fn create(&self, client: &AuxoClient, body: Value) -> Result<Value, ApiError> {
        client.post(&constants::collection_path(self.path), body).await
    }

    /// Replace a record wholesale.
    pub async fn replace(
        &self,
        client: &AuxoClient,
        id: &str,
        body: Value,
    ) -> Result<Value, ApiError> {
        client.put(&constants::record_path(self.path, id), body).await
    }

    /// Update selected fields of a record.
    pub async fn patch(
        &self,
        client: &AuxoClient,
        id: &str,
        body: Value,
    ) -> Result<Value, ApiError> {
        client.patch(&constants::record_path(self.path, id), body).await
    }

    /// Delete a record.
    pub async fn delete(&self, client: &AuxoClient, id: &str) -> Result<Value, ApiError> {
        client.delete(&constants::record_path(self.path, id)).await
    }
}
