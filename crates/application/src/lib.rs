//! Restcase Application - Clients and runner
//!
//! This crate holds everything between the domain types and the concrete
//! HTTP adapter:
//! - the [`HttpClient`] port implemented by infrastructure,
//! - the Transport Client ([`ApiClient`]) and Resource Client
//!   ([`ResourceClient`]) built on it,
//! - the data-driven [`CaseRunner`].

pub mod error;
pub mod ports;
pub mod resource;
pub mod runner;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use error::{RunnerError, RunnerResult};
pub use ports::{HttpClient, HttpClientError};
pub use resource::ResourceClient;
pub use runner::{
    CaseOperation, CaseRunner, GroupBinding, InstanceFilter, ResourceCall, RunEvent, TestInstance,
};
pub use transport::{ApiClient, DEFAULT_BASE_URL, RequestOptions, TransportConfig};
