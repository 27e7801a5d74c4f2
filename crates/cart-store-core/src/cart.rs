//! Cart: the ordered set of line items and the reconciliation rules that
//! merge a requested mutation into it.
//!
//! Every rule takes the current cart by `&mut self`, applies the mutation in
//! place and reports a [`Change`]. Items keep their position when their
//! quantity changes; new items go to the end.

use serde::{Deserialize, Serialize};

use crate::error::CartCoreError;
use crate::item::{LineItem, NewItem};
use crate::validation::validate_items;

/// What decrementing an item that holds a single unit does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecrementPolicy {
    /// The item stays in the cart with quantity 1.
    #[default]
    ClampAtOne,
    /// The item is removed from the cart.
    RemoveAtZero,
}

/// The effect of one reconciliation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A new line was appended at `index`.
    Inserted { index: usize },
    /// The line at `index` now holds `quantity` units.
    QuantityChanged { index: usize, quantity: u32 },
    /// The line at `index` was removed.
    Removed { index: usize },
    /// Nothing changed.
    Unchanged,
}

impl Change {
    /// Whether the cart differs from before the step.
    pub fn is_changed(&self) -> bool {
        !matches!(self, Change::Unchanged)
    }
}

/// An ordered sequence of line items, unique by id.
///
/// Deserializing goes through [`validate_items`], so a decoded cart holds the
/// same guarantees as one built by the reconciliation rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate the lines in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Position of the line with `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// The line with `id`.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether a line with `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Sum of quantities over all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Add one unit of `item`.
    ///
    /// An unknown id is appended with quantity 1. A known id has its quantity
    /// bumped; the incoming title, image and price are ignored so that the
    /// existing line is kept as first added.
    pub fn add(&mut self, item: NewItem) -> Change {
        match self.position(&item.id) {
            Some(index) => self.bump(index),
            None => {
                self.items.push(item.into_line_item());
                Change::Inserted {
                    index: self.items.len() - 1,
                }
            }
        }
    }

    /// Add one unit to the line with `id`. Unknown ids are ignored.
    pub fn increment(&mut self, id: &str) -> Change {
        match self.position(id) {
            Some(index) => self.bump(index),
            None => Change::Unchanged,
        }
    }

    /// Remove one unit from the line with `id`. Unknown ids are ignored.
    ///
    /// A line holding a single unit is handled according to `policy`.
    pub fn decrement(&mut self, id: &str, policy: DecrementPolicy) -> Change {
        let Some(index) = self.position(id) else {
            return Change::Unchanged;
        };

        let quantity = self.items[index].quantity;
        if quantity > 1 {
            self.items[index].quantity = quantity - 1;
            return Change::QuantityChanged {
                index,
                quantity: quantity - 1,
            };
        }

        match policy {
            DecrementPolicy::ClampAtOne => Change::Unchanged,
            DecrementPolicy::RemoveAtZero => {
                self.items.remove(index);
                Change::Removed { index }
            }
        }
    }

    fn bump(&mut self, index: usize) -> Change {
        let item = &mut self.items[index];
        let quantity = item.quantity.saturating_add(1);
        if quantity == item.quantity {
            return Change::Unchanged;
        }
        item.quantity = quantity;
        Change::QuantityChanged { index, quantity }
    }

    /// Build a cart from lines without checking them.
    ///
    /// Callers are expected to have run [`crate::validate_items`] first.
    pub(crate) fn from_items_unchecked(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Consume the cart, returning its lines.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartCoreError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        validate_items(&items)?;
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
