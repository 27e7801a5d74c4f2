//! Explicit slot for handing the cart to the presentation layer.
//!
//! The application's composition root creates one [`CartStore`] and installs
//! it in a [`CartContext`]. Code that reaches the cart through the context
//! gets [`CartError::NoStore`] when nothing was installed, instead of an
//! empty cart that looks valid.

use cart_store_storage::KeyValueStorage;

use crate::error::{CartError, Result};
use crate::store::CartStore;

/// Holds the application's cart store, if one has been installed.
pub struct CartContext<S: KeyValueStorage + 'static> {
    store: Option<CartStore<S>>,
}

impl<S: KeyValueStorage + 'static> CartContext<S> {
    /// A context with no store installed.
    pub fn empty() -> Self {
        Self { store: None }
    }

    /// A context serving `store`.
    pub fn new(store: CartStore<S>) -> Self {
        Self { store: Some(store) }
    }

    /// Install `store`, returning the one it replaces.
    pub fn install(&mut self, store: CartStore<S>) -> Option<CartStore<S>> {
        self.store.replace(store)
    }

    /// The installed store.
    pub fn store(&self) -> Result<&CartStore<S>> {
        self.store.as_ref().ok_or(CartError::NoStore)
    }

    /// Whether a store is installed.
    pub fn is_installed(&self) -> bool {
        self.store.is_some()
    }
}

impl<S: KeyValueStorage + 'static> Default for CartContext<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: KeyValueStorage + 'static> Clone for CartContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}
