//! Line items: a product plus the quantity held in the cart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A product as offered to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    /// Opaque product identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image location.
    pub image_url: String,
    /// Unit price. Finite and non-negative.
    pub price: f64,
}

impl NewItem {
    /// Create a new item.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Turn the offer into a line item holding a single unit.
    pub fn into_line_item(self) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}

/// One product entry in the cart.
///
/// `quantity` is never zero while the item is held or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Opaque product identifier, unique within a cart.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image location.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Units held, at least 1.
    pub quantity: u32,
}

impl LineItem {
    /// Price of all units of this line.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.id, self.quantity)
    }
}
