//! # Cart Store Core
//!
//! Pure primitives for the Cart Store: line items, the ordered cart, the
//! reconciliation rules applied by each mutation, and the persisted snapshot
//! format.
//!
//! This crate contains no I/O, no storage, no async. Every function here is
//! a computation over an in-memory [`Cart`] value.
//!
//! ## Key Types
//!
//! - [`LineItem`] - A product plus a quantity (always `>= 1`)
//! - [`NewItem`] - A product as offered to `add`, without a quantity
//! - [`Cart`] - Ordered sequence of line items, unique by id
//! - [`Change`] - What a reconciliation step did to the cart
//! - [`DecrementPolicy`] - What decrementing a quantity-1 item means
//!
//! ## Snapshots
//!
//! The whole cart is persisted as one self-describing JSON document. See the
//! [`snapshot`] module.

pub mod cart;
pub mod error;
pub mod item;
pub mod snapshot;
pub mod validation;

pub use cart::{Cart, Change, DecrementPolicy};
pub use error::{CartCoreError, Result};
pub use item::{LineItem, NewItem};
pub use snapshot::{decode_snapshot, encode_snapshot, SnapshotFormat, SNAPSHOT_VERSION};
pub use validation::{validate_items, validate_new_item};
