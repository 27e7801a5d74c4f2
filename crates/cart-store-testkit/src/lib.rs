//! # Cart Store Testkit
//!
//! Testing utilities for the Cart Store.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Storage doubles**: backends that add latency, fail on demand, or
//!   record every write, for exercising persistence ordering and recovery
//! - **Generators**: Proptest strategies for items and operation sequences
//! - **Fixtures**: Sample catalogue items and pre-built snapshots
//!
//! ## Storage Doubles
//!
//! ```rust
//! use std::time::Duration;
//! use cart_store_storage::MemoryStorage;
//! use cart_store_testkit::doubles::SlowStorage;
//!
//! let storage = SlowStorage::new(MemoryStorage::new(), Duration::from_millis(20));
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cart_store_testkit::generators::{cart_ops, apply_ops};
//!
//! proptest! {
//!     #[test]
//!     fn quantities_stay_positive(ops in cart_ops(64)) {
//!         let cart = apply_ops(&ops, Default::default());
//!         prop_assert!(cart.iter().all(|i| i.quantity >= 1));
//!     }
//! }
//! ```

pub mod doubles;
pub mod fixtures;
pub mod generators;

pub use doubles::{FailingStorage, GatedStorage, RecordingStorage, SlowStorage};
pub use fixtures::{catalogue, legacy_snapshot, sample_item};
pub use generators::{any_price, apply_ops, cart_ops, new_item, CartOp};
