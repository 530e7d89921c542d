//! Restcase Domain - Core types
//!
//! This crate defines the domain model of the restcase API test harness:
//! requests and responses crossing the transport boundary, data-driven case
//! definitions, and the reports produced by a run.
//! All types here are pure Rust with no I/O dependencies.

pub mod cases;
pub mod error;
pub mod request;
pub mod response;
pub mod testing;

pub use cases::{CaseBook, CaseGroup, EXPECTED_PREFIX, TestCase};
pub use error::{DomainError, DomainResult};
pub use request::{Header, Headers, HttpMethod, QueryParam, QueryParams, RequestBody, RequestSpec};
pub use response::ResponseSpec;
pub use testing::{
    CheckResult, Expectation, InstanceId, InstanceReport, InstanceState, RunReport,
};
