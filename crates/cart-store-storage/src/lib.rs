//! # Cart Store Storage
//!
//! Storage abstraction for the Cart Store. The store persists its whole cart
//! as one string under one key, so the backend only has to offer `get` and
//! `set` on string keys.
//!
//! ## Key Types
//!
//! - [`KeyValueStorage`] - The async trait every backend implements
//! - [`SqliteStorage`] - SQLite-based durable storage
//! - [`MemoryStorage`] - In-memory storage for tests and throwaway sessions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cart_store_storage::{KeyValueStorage, SqliteStorage};
//!
//! async fn example() {
//!     let storage = SqliteStorage::open("cart.db").unwrap();
//!
//!     storage.set("@GoMarketplace:cart", "[]".to_string()).await.unwrap();
//!     let raw = storage.get("@GoMarketplace:cart").await.unwrap();
//!     assert_eq!(raw.as_deref(), Some("[]"));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-value writes**: `set` replaces the value; there are no partial updates
//! - **Missing keys**: `get` returns `Ok(None)`, never an error
//! - **Blocking backends**: SQLite calls run on `spawn_blocking`

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StorageError};
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::KeyValueStorage;
