//! Resource-scoped operations over the transport client.

use std::fmt::Display;

use restcase_domain::{QueryParams, RequestBody, ResponseSpec};
use serde_json::Value;

use crate::ports::{HttpClient, HttpClientError};
use crate::transport::ApiClient;

/// CRUD vocabulary for one resource type under a fixed URL prefix.
///
/// Identifiers and payloads are passed through as given; whatever the
/// remote side answers is returned unchanged.
pub struct ResourceClient<C> {
    api: ApiClient<C>,
    prefix: String,
}

impl<C> Clone for ResourceClient<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            prefix: self.prefix.clone(),
        }
    }
}

impl<C: HttpClient> ResourceClient<C> {
    /// Creates a client for the resource mounted at `prefix`.
    pub fn new(api: ApiClient<C>, prefix: impl Into<String>) -> Self {
        Self {
            api,
            prefix: prefix.into(),
        }
    }

    /// The `/posts` resource.
    pub fn posts(api: ApiClient<C>) -> Self {
        Self::new(api, "/posts")
    }

    /// Returns the resource prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the underlying transport client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient<C> {
        &self.api
    }

    /// Path of a single item: `prefix/id`.
    #[must_use]
    pub fn item_path(&self, id: impl Display) -> String {
        format!("{}/{id}", self.prefix)
    }

    /// Lists every item.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub async fn list(&self) -> Result<ResponseSpec, HttpClientError> {
        self.api.get(&self.prefix, QueryParams::new()).await
    }

    /// Fetches one item.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub async fn get(&self, id: &str) -> Result<ResponseSpec, HttpClientError> {
        self.api.get(&self.item_path(id), QueryParams::new()).await
    }

    /// Creates an item from a JSON payload.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub async fn create(&self, payload: &Value) -> Result<ResponseSpec, HttpClientError> {
        self.api
            .post(&self.prefix, RequestBody::json(payload.clone()))
            .await
    }

    /// Replaces one item with a JSON payload.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub async fn update(&self, id: &str, payload: &Value) -> Result<ResponseSpec, HttpClientError> {
        self.api
            .put(&self.item_path(id), RequestBody::json(payload.clone()))
            .await
    }

    /// Deletes one item.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub async fn delete(&self, id: &str) -> Result<ResponseSpec, HttpClientError> {
        self.api.delete(&self.item_path(id)).await
    }
}
