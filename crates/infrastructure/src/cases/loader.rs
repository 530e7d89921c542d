//! YAML case file loading.

use std::io;
use std::path::{Path, PathBuf};

use restcase_domain::{CaseBook, DomainError};
use tracing::info;

/// Error type for case file loading. Every variant is fatal for a run.
#[derive(Debug, thiserror::Error)]
pub enum CaseLoadError {
    /// The file does not exist.
    #[error("case file not found: {}", .path.display())]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read case file {}: {source}", .path.display())]
    Io {
        /// Requested path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The file is not a mapping of group names to case lists.
    #[error("malformed case file {}: {source}", .path.display())]
    Parse {
        /// Requested path.
        path: PathBuf,
        /// YAML error, with location.
        source: serde_yaml::Error,
    },

    /// A case breaks the case file conventions.
    #[error("invalid case file {}: {source}", .path.display())]
    Invalid {
        /// Requested path.
        path: PathBuf,
        /// First violation found.
        source: DomainError,
    },

    /// The shared book was already loaded from another file.
    #[error(
        "case file already loaded from {}, refusing to load {}",
        .loaded.display(),
        .requested.display()
    )]
    AlreadyLoaded {
        /// Path the shared book came from.
        loaded: PathBuf,
        /// Path of the rejected call.
        requested: PathBuf,
    },
}

/// Parses case file content; `path` is only used in error messages.
///
/// # Errors
///
/// [`CaseLoadError::Parse`] for malformed YAML or records missing `name` or
/// `expected_status`, [`CaseLoadError::Invalid`] for structural violations
/// (empty group, duplicate or blank name, impossible status).
pub fn parse_case_book(path: &Path, yaml: &str) -> Result<CaseBook, CaseLoadError> {
    let book: CaseBook = serde_yaml::from_str(yaml).map_err(|source| CaseLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    book.validate().map_err(|source| CaseLoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(book)
}

/// Reads and parses a case file.
///
/// Every call reads the file again; see [`shared_case_book`](super::shared_case_book)
/// for the load-once variant.
///
/// # Errors
///
/// [`CaseLoadError::NotFound`] or [`CaseLoadError::Io`] if the file cannot be
/// read, otherwise see [`parse_case_book`].
pub fn load_case_book(path: impl AsRef<Path>) -> Result<CaseBook, CaseLoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CaseLoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            CaseLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let book = parse_case_book(path, &content)?;
    info!(
        path = %path.display(),
        groups = book.len(),
        cases = book.total_cases(),
        "case file loaded"
    );
    Ok(book)
}
