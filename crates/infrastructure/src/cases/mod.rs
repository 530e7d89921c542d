//! Case file loading and the process-wide case book.

mod loader;

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use restcase_domain::CaseBook;

pub use loader::{CaseLoadError, load_case_book, parse_case_book};

static SHARED_BOOK: OnceCell<(PathBuf, CaseBook)> = OnceCell::new();

/// Loads the case file at most once per process and hands out the same
/// immutable book on every later call.
///
/// Paths are compared as given, without canonicalisation.
///
/// # Errors
///
/// Any [`load_case_book`] error while no book is loaded yet (a failed load
/// is retried by the next call), or [`CaseLoadError::AlreadyLoaded`] if the
/// book was loaded from a different path.
pub fn shared_case_book(path: impl AsRef<Path>) -> Result<&'static CaseBook, CaseLoadError> {
    let path = path.as_ref();
    let (loaded, book) =
        SHARED_BOOK.get_or_try_init(|| load_case_book(path).map(|book| (path.to_path_buf(), book)))?;

    if loaded != path {
        return Err(CaseLoadError::AlreadyLoaded {
            loaded: loaded.clone(),
            requested: path.to_path_buf(),
        });
    }
    Ok(book)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // The only test touching the process-wide book.
    #[test]
    fn test_shared_book_is_loaded_once() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yaml");
        let path = dir.path().join("cases.yaml");
        std::fs::write(&path, "g:\n  - {name: a, expected_status: 200}\n").unwrap();

        assert!(matches!(
            shared_case_book(&missing),
            Err(CaseLoadError::NotFound { .. })
        ));

        let first = shared_case_book(&path).unwrap();
        std::fs::write(&path, "other:\n  - {name: b, expected_status: 201}\n").unwrap();
        let second = shared_case_book(&path).unwrap();

        assert!(std::ptr::eq(first, second));
        assert!(second.group("g").is_some());

        let other = dir.path().join("other.yaml");
        assert!(matches!(
            shared_case_book(&other),
            Err(CaseLoadError::AlreadyLoaded { .. })
        ));
    }
}
