//! Transport client.
//!
//! Fixes the base endpoint, default headers and timeout, and turns
//! verb-level calls into [`RequestSpec`]s for an [`HttpClient`].

use std::sync::Arc;
use std::time::Duration;

use restcase_domain::{
    Header, Headers, HttpMethod, QueryParams, RequestBody, RequestSpec, ResponseSpec,
};
use tracing::{debug, error};

use crate::ports::{HttpClient, HttpClientError};

/// Service addressed when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Endpoint, headers and timeout shared by every request of a client.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Prefix of every request URL.
    pub base_url: String,
    /// Headers attached to every request.
    pub headers: Headers,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl TransportConfig {
    /// Default config pointed at another endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Adds or replaces a default header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(Header::new(name, value));
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        let headers = std::iter::once(Header::new("Content-Type", "application/json")).collect();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers,
            timeout: RequestSpec::DEFAULT_TIMEOUT,
        }
    }
}

/// Per-call extras forwarded to the HTTP client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query parameters.
    pub query: QueryParams,
    /// Request body.
    pub body: RequestBody,
}

impl RequestOptions {
    /// No query, no body.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            query: QueryParams::new(),
            body: RequestBody::None,
        }
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

/// Generic REST client bound to one endpoint.
///
/// Holds no per-call state, so one instance can serve any number of
/// sequential calls.
pub struct ApiClient<C> {
    client: Arc<C>,
    config: TransportConfig,
}

impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            config: self.config.clone(),
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// Creates a client dispatching through `client`.
    pub const fn new(client: Arc<C>, config: TransportConfig) -> Self {
        Self { client, config }
    }

    /// Returns the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Full URL for a path: the base URL followed by the path, verbatim.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Builds the request `dispatch` would send.
    #[must_use]
    pub fn build_request(&self, method: HttpMethod, path: &str, options: RequestOptions) -> RequestSpec {
        RequestSpec {
            method,
            url: self.url(path),
            headers: self.config.headers.clone(),
            query: options.query,
            body: options.body,
            timeout: self.config.timeout,
        }
    }

    /// Sends one request and returns the response unchanged.
    ///
    /// # Errors
    ///
    /// Transport failures are logged and returned as they came from the
    /// HTTP client.
    pub async fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<ResponseSpec, HttpClientError> {
        let request = self.build_request(method, path, options);
        debug!(%method, url = %request.url, "dispatching request");

        match self.client.send(&request).await {
            Ok(response) => {
                debug!(
                    %method,
                    url = %request.url,
                    status = response.status,
                    elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
                    "response received"
                );
                Ok(response)
            }
            Err(err) => {
                error!(%method, url = %request.url, error = %err, "request failed");
                Err(err)
            }
        }
    }

    /// GET with query parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::dispatch`].
    pub async fn get(&self, path: &str, params: QueryParams) -> Result<ResponseSpec, HttpClientError> {
        self.dispatch(HttpMethod::Get, path, RequestOptions::new().query(params))
            .await
    }

    /// POST with a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::dispatch`].
    pub async fn post(&self, path: &str, body: RequestBody) -> Result<ResponseSpec, HttpClientError> {
        self.dispatch(HttpMethod::Post, path, RequestOptions::new().body(body))
            .await
    }

    /// PUT with a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::dispatch`].
    pub async fn put(&self, path: &str, body: RequestBody) -> Result<ResponseSpec, HttpClientError> {
        self.dispatch(HttpMethod::Put, path, RequestOptions::new().body(body))
            .await
    }

    /// DELETE.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::dispatch`].
    pub async fn delete(&self, path: &str) -> Result<ResponseSpec, HttpClientError> {
        self.dispatch(HttpMethod::Delete, path, RequestOptions::new())
            .await
    }
}
