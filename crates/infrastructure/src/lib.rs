//! Restcase Infrastructure - Adapters and implementations
//!
//! This crate provides the concrete HTTP client behind the application
//! layer's `HttpClient` port, and the YAML case file loader.

pub mod adapters;
pub mod cases;

pub use adapters::ReqwestHttpClient;
pub use cases::{CaseLoadError, load_case_book, parse_case_book, shared_case_book};
