//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A test case record violates the case file conventions.
    #[error("invalid case '{case}' in group '{group}': {reason}")]
    InvalidCase {
        /// Group the case belongs to.
        group: String,
        /// Case name (or its position when the name itself is missing).
        case: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two cases in the same group share a name.
    #[error("duplicate case name '{case}' in group '{group}'")]
    DuplicateCase {
        /// Group containing the duplicates.
        group: String,
        /// The repeated name.
        case: String,
    },
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidCase`].
    pub fn invalid_case(
        group: impl Into<String>,
        case: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidCase {
            group: group.into(),
            case: case.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
