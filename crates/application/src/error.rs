//! Application error types

use restcase_domain::DomainError;
use thiserror::Error;

/// Errors that stop a run before or while collecting test instances.
///
/// Assertion failures are never reported through this type; they end up as
/// failed instances in the run report.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Case data violates the conventions of its group.
    #[error("invalid case data: {0}")]
    InvalidCases(#[from] DomainError),

    /// A case group has no operation bound to it.
    #[error("no operation bound to case group '{0}'")]
    UnknownGroup(String),

    /// A bound case group is absent from the case file.
    #[error("case group '{0}' is missing from the case file")]
    MissingGroup(String),
}

/// Result type alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;
