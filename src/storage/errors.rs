//! Storage error types
//!
//! Every failure reaching the HTTP layer from here is reported as a
//! `StorageError` (500). A missing row is never an error at this level:
//! lookups return `Option` and deletes return `bool`.

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by the storage accessor
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking holder
    #[error("connection lock poisoned: {0}")]
    LockPoisoned(String),

    /// Schema migration failed
    #[error("migration error: {0}")]
    Migration(String),

    /// Failure opening the database file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StorageError::Migration("unknown migration version: 9".to_string());
        assert_eq!(err.to_string(), "migration error: unknown migration version: 9");

        let err = StorageError::LockPoisoned("boom".to_string());
        assert!(err.to_string().contains("poisoned"));
    }

    #[test]
    fn test_from_rusqlite() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StorageError::Database(_)));
    }
}
