//! Error types for the Cart Store Core.

use thiserror::Error;

/// Errors raised by validation and snapshot encoding.
#[derive(Debug, Error)]
pub enum CartCoreError {
    /// An item offered to the cart violates its input constraints.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// A persisted snapshot could not be decoded into a valid cart.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// A cart could not be serialized.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CartCoreError>;
