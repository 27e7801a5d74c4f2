//! Test fixtures and helpers.
//!
//! Common catalogue items and stored snapshots for integration tests.

use cart_store_core::NewItem;

/// A catalogue item with predictable fields derived from `id`.
pub fn sample_item(id: &str) -> NewItem {
    NewItem::new(
        id,
        format!("Product {id}"),
        format!("https://cdn.example.com/products/{id}.png"),
        10.0,
    )
}

/// A small catalogue with distinct ids and prices.
pub fn catalogue() -> Vec<NewItem> {
    vec![
        NewItem::new(
            "1",
            "Camiseta Hello World",
            "https://cdn.example.com/products/1.png",
            120.0,
        ),
        NewItem::new(
            "2",
            "Camiseta Rocketseat",
            "https://cdn.example.com/products/2.png",
            89.9,
        ),
        NewItem::new(
            "3",
            "Caneca Preta",
            "https://cdn.example.com/products/3.png",
            29.5,
        ),
        NewItem::new(
            "4",
            "Adesivo",
            "https://cdn.example.com/products/4.png",
            0.0,
        ),
    ]
}

/// A snapshot in the bare-array layout written by older clients.
///
/// Holds item `"1"` with quantity 2 followed by item `"3"` with quantity 1.
pub fn legacy_snapshot() -> String {
    r#"[{"id":"1","title":"Camiseta Hello World","image_url":"https://cdn.example.com/products/1.png","price":120,"quantity":2},{"id":"3","title":"Caneca Preta","image_url":"https://cdn.example.com/products/3.png","price":29.5,"quantity":1}]"#
        .to_string()
}
