//! HTTP Client port

use async_trait::async_trait;
use restcase_domain::{RequestSpec, ResponseSpec};
use thiserror::Error;

/// Failures below the HTTP layer: nothing came back to assert on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No complete response within the timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Host name could not be resolved.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying resolver message.
        message: String,
    },

    /// Remote end refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connect-phase failure (TLS, reset, ...).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Redirect limit of the transport exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Anything else reported by the HTTP library.
    #[error("{0}")]
    Other(String),
}

/// Port for performing one HTTP exchange.
///
/// Implementations perform exactly the request they are given: no retries,
/// no interpretation of the status code.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received (connection, DNS,
    /// timeout) or the request could not be built.
    async fn send(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError>;
}
