//! Proptest generators for property-based testing.

use proptest::prelude::*;

use cart_store_core::{Cart, DecrementPolicy, NewItem};

/// Generate a product id from a small pool, so operations collide often.
pub fn item_id() -> impl Strategy<Value = String> {
    (0u8..6).prop_map(|n| format!("sku-{n}"))
}

/// Generate a valid price: usually a whole number of cents, sometimes any
/// finite non-negative `f64`.
pub fn price() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => (0u32..100_000).prop_map(|cents| f64::from(cents) / 100.0),
        1 => any_price(),
    ]
}

/// Generate any finite non-negative `f64`, subnormals and extremes included.
pub fn any_price() -> impl Strategy<Value = f64> {
    any::<f64>()
        .prop_filter("finite", |p| p.is_finite())
        .prop_map(f64::abs)
}

/// Generate a valid item offered to the cart.
pub fn new_item() -> impl Strategy<Value = NewItem> {
    (item_id(), "[A-Za-z ]{1,24}", price()).prop_map(|(id, title, price)| {
        let image_url = format!("https://cdn.example.com/{id}.png");
        NewItem::new(id, title, image_url, price)
    })
}

/// One mutation requested of the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartOp {
    Add(NewItem),
    Increment(String),
    Decrement(String),
}

/// Generate a single operation.
pub fn cart_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        new_item().prop_map(CartOp::Add),
        item_id().prop_map(CartOp::Increment),
        item_id().prop_map(CartOp::Decrement),
    ]
}

/// Generate up to `max_len` operations.
pub fn cart_ops(max_len: usize) -> impl Strategy<Value = Vec<CartOp>> {
    prop::collection::vec(cart_op(), 0..=max_len)
}

/// Apply `ops` in order to an empty cart.
///
/// This is the reference model the store's behaviour is checked against.
pub fn apply_ops(ops: &[CartOp], policy: DecrementPolicy) -> Cart {
    let mut cart = Cart::new();
    for op in ops {
        match op {
            CartOp::Add(item) => {
                cart.add(item.clone());
            }
            CartOp::Increment(id) => {
                cart.increment(id);
            }
            CartOp::Decrement(id) => {
                cart.decrement(id, policy);
            }
        }
    }
    cart
}
