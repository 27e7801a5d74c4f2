//! Input and snapshot validation.

use std::collections::HashSet;

use crate::error::{CartCoreError, Result};
use crate::item::{LineItem, NewItem};

/// Check an item offered to the cart.
///
/// The id must be non-empty and the price finite and non-negative.
pub fn validate_new_item(item: &NewItem) -> Result<()> {
    check_id(&item.id)?;
    check_price(&item.id, item.price)
}

/// Check a sequence of line items read back from storage.
///
/// This performs:
/// - Per-item id and price checks
/// - Quantity check (never zero)
/// - Uniqueness of ids
pub fn validate_items(items: &[LineItem]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        check_id(&item.id)?;
        check_price(&item.id, item.price)?;

        if item.quantity == 0 {
            return Err(CartCoreError::InvalidItem(format!(
                "item {} has zero quantity",
                item.id
            )));
        }

        if !seen.insert(item.id.as_str()) {
            return Err(CartCoreError::InvalidItem(format!(
                "duplicate item id {}",
                item.id
            )));
        }
    }

    Ok(())
}

fn check_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(CartCoreError::InvalidItem("item id is empty".into()));
    }
    Ok(())
}

fn check_price(id: &str, price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(CartCoreError::InvalidItem(format!(
            "item {id} has invalid price {price}"
        )));
    }
    Ok(())
}
