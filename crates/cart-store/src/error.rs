//! Error types for the Cart Store.

use cart_store_core::CartCoreError;
use cart_store_storage::StorageError;
use thiserror::Error;

/// Errors that can occur when using the Cart Store.
///
/// Storage failures during hydration and persistence are recovered inside
/// the store and never reach the mutating operations; they only appear here
/// for callers that talk to storage directly.
#[derive(Debug, Error)]
pub enum CartError {
    /// The item offered to the cart violates its input constraints.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// The cart was used where no store has been installed.
    #[error("no cart store installed in this context")]
    NoStore,

    /// The store was created outside a tokio runtime.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CartCoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for Cart Store operations.
pub type Result<T> = std::result::Result<T, CartError>;
