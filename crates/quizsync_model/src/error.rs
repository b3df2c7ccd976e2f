//! Error types for the storage collaborator.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors the storage collaborator can surface.
///
/// A failed load or replace never leaves the store partially written;
/// callers treat any variant as "this sync session failed", not as a
/// process-fatal condition.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file could not be read or written.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored state could not be parsed.
    #[error("store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let err: StoreError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn corrupt_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: StoreError = parse_err.into();
        assert!(err.to_string().starts_with("store is corrupt"));
    }
}
