//! # Cart Store
//!
//! A shopping cart held in memory and kept in step with durable key-value
//! storage, restored from that storage when the process starts.
//!
//! ## Overview
//!
//! - **Cart**: an ordered list of line items, unique by product id
//! - **Mutations**: add, increment and decrement, serialized so none is lost
//! - **Persistence**: the whole cart is written after every change, in order,
//!   without making callers wait
//! - **Hydration**: the stored cart is loaded once at startup; a missing or
//!   corrupt value means an empty cart
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cart_store::{CartConfig, CartStore, NewItem};
//! use cart_store::storage::SqliteStorage;
//!
//! async fn example() {
//!     let storage = SqliteStorage::open("cart.db").unwrap();
//!     let store = CartStore::open(storage, CartConfig::default()).await.unwrap();
//!
//!     store
//!         .add_to_cart(NewItem::new("sku-1", "Tee", "https://img/sku-1.png", 19.9))
//!         .await
//!         .unwrap();
//!     store.increment("sku-1").await;
//!
//!     assert_eq!(store.cart().get("sku-1").unwrap().quantity, 2);
//!
//!     // Wait for the snapshot to reach storage before shutting down.
//!     store.flush().await;
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `cart_store::core` - Line items, cart reconciliation, snapshots
//! - `cart_store::storage` - Storage trait and backends

pub mod config;
pub mod context;
pub mod error;
mod persist;
pub mod store;

// Re-export component crates
pub use cart_store_core as core;
pub use cart_store_storage as storage;

// Re-export main types for convenience
pub use config::{CartConfig, DEFAULT_STORAGE_KEY};
pub use context::CartContext;
pub use error::{CartError, Result};
pub use store::{CartStore, HydrationOutcome, PersistenceStatus};

// Re-export commonly used core types
pub use cart_store_core::{Cart, DecrementPolicy, LineItem, NewItem};
