//! KeyValueStorage trait: the abstract interface for snapshot persistence.
//!
//! This trait keeps the cart store backend-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Async string key-value storage.
///
/// All methods are async so that blocking backends (SQLite) and truly
/// asynchronous ones can sit behind the same interface.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored at `key`.
    ///
    /// Returns `Ok(None)` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored at `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

#[async_trait]
impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value).await
    }
}
