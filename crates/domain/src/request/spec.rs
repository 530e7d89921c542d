//! Request specification type

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Header, Headers, HttpMethod, QueryParams, RequestBody};

/// Fully resolved request handed to an HTTP client.
///
/// The URL is absolute; query parameters are kept apart so the
/// adapter can encode them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute target URL
    pub url: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Query parameters appended to the URL
    #[serde(default)]
    pub query: QueryParams,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
    /// Upper bound for the whole exchange
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
}

impl RequestSpec {
    /// Default timeout applied when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a request with no headers, query or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            query: QueryParams::new(),
            body: RequestBody::none(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Sets a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(Header::new(name, value));
        self
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::QueryParams;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_request_defaults() {
        let req = RequestSpec::get("https://api.example.com/posts");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.example.com/posts");
        assert_eq!(req.timeout, Duration::from_secs(10));
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_builder() {
        let req = RequestSpec::new(HttpMethod::Put, "https://api.example.com/posts/1")
            .with_header("Content-Type", "application/json")
            .with_query(QueryParams::new().with("draft", "true"))
            .with_body(RequestBody::text("hello"))
            .with_timeout(Duration::from_millis(250));

        assert_eq!(req.headers.get("content-type"), Some("application/json"));
        assert_eq!(req.query.len(), 1);
        assert_eq!(req.timeout, Duration::from_millis(250));
    }
}
