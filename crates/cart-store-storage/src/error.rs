//! Error types for the storage module.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Failure reported by a backend that is not SQLite.
    #[error("backend error: {0}")]
    Backend(String),

    /// A blocking task could not be joined.
    #[error("task error: {0}")]
    Task(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
