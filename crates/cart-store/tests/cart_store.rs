//! Behaviour of the three cart mutations as seen through the store.

use cart_store::storage::MemoryStorage;
use cart_store::{CartConfig, CartContext, CartError, CartStore, DecrementPolicy, NewItem};
use cart_store_testkit::{catalogue, sample_item};

async fn open_store(config: CartConfig) -> CartStore<MemoryStorage> {
    CartStore::open(MemoryStorage::new(), config)
        .await
        .expect("store opens")
}

fn lines(store: &CartStore<MemoryStorage>) -> Vec<(String, u32)> {
    store
        .cart()
        .iter()
        .map(|item| (item.id.clone(), item.quantity))
        .collect()
}

#[tokio::test]
async fn distinct_items_are_added_once_in_order() -> anyhow::Result<()> {
    let store = open_store(CartConfig::default()).await;

    for item in catalogue() {
        store.add_to_cart(item).await?;
    }

    let expected: Vec<(String, u32)> = catalogue().into_iter().map(|i| (i.id, 1)).collect();
    assert_eq!(lines(&store), expected);
    Ok(())
}

#[tokio::test]
async fn adding_twice_equals_add_then_increment() -> anyhow::Result<()> {
    let twice = open_store(CartConfig::default()).await;
    twice.add_to_cart(sample_item("x")).await?;
    twice.add_to_cart(sample_item("y")).await?;
    twice.add_to_cart(sample_item("x")).await?;

    let incremented = open_store(CartConfig::default()).await;
    incremented.add_to_cart(sample_item("x")).await?;
    incremented.add_to_cart(sample_item("y")).await?;
    incremented.increment("x").await;

    assert_eq!(twice.cart(), incremented.cart());
    assert_eq!(lines(&twice), vec![("x".into(), 2), ("y".into(), 1)]);
    Ok(())
}

#[tokio::test]
async fn re_adding_keeps_original_fields() -> anyhow::Result<()> {
    let store = open_store(CartConfig::default()).await;
    store.add_to_cart(NewItem::new("x", "Original", "a.png", 5.0)).await?;
    store.add_to_cart(NewItem::new("x", "Changed", "b.png", 7.0)).await?;

    let cart = store.cart();
    let line = cart.get("x").expect("line present");
    assert_eq!(line.title, "Original");
    assert_eq!(line.image_url, "a.png");
    assert_eq!(line.price, 5.0);
    assert_eq!(line.quantity, 2);
    Ok(())
}

#[tokio::test]
async fn increment_unknown_id_changes_nothing() -> anyhow::Result<()> {
    let store = open_store(CartConfig::default()).await;
    store.add_to_cart(sample_item("x")).await?;
    let before = store.cart();

    store.increment("not-there").await;

    assert_eq!(store.cart(), before);
    assert_eq!(store.persistence().await.published, 1);
    Ok(())
}

#[tokio::test]
async fn decrement_above_one_keeps_position_and_fields() -> anyhow::Result<()> {
    let store = open_store(CartConfig::default()).await;
    store.add_to_cart(sample_item("x")).await?;
    store.add_to_cart(sample_item("y")).await?;
    store.add_to_cart(sample_item("z")).await?;
    store.increment("y").await;
    store.increment("y").await;
    let before = store.cart().get("y").cloned().expect("y present");

    store.decrement("y").await;

    let cart = store.cart();
    let after = cart.get("y").expect("y present");
    assert_eq!(cart.position("y"), Some(1));
    assert_eq!(after.quantity, 2);
    assert_eq!(after.title, before.title);
    assert_eq!(after.price, before.price);
    Ok(())
}

#[tokio::test]
async fn decrement_at_one_clamps_by_default() -> anyhow::Result<()> {
    let store = open_store(CartConfig::default()).await;
    store.add_to_cart(sample_item("x")).await?;

    store.decrement("x").await;
    store.decrement("x").await;

    assert_eq!(lines(&store), vec![("x".into(), 1)]);
    assert_eq!(store.persistence().await.published, 1);
    Ok(())
}

#[tokio::test]
async fn decrement_at_one_removes_under_remove_policy() -> anyhow::Result<()> {
    let config = CartConfig::default().with_decrement_policy(DecrementPolicy::RemoveAtZero);
    let store = open_store(config).await;
    store.add_to_cart(sample_item("x")).await?;
    store.add_to_cart(sample_item("y")).await?;

    store.decrement("x").await;

    assert_eq!(lines(&store), vec![("y".into(), 1)]);
    Ok(())
}

#[tokio::test]
async fn walkthrough_with_default_policy() -> anyhow::Result<()> {
    let store = open_store(CartConfig::default()).await;

    store.add_to_cart(NewItem::new("a", "T", "u", 10.0)).await?;
    assert_eq!(lines(&store), vec![("a".into(), 1)]);

    store.add_to_cart(NewItem::new("b", "T", "u", 10.0)).await?;
    assert_eq!(lines(&store), vec![("a".into(), 1), ("b".into(), 1)]);

    store.increment("a").await;
    assert_eq!(lines(&store), vec![("a".into(), 2), ("b".into(), 1)]);

    store.decrement("b").await;
    assert_eq!(lines(&store), vec![("a".into(), 2), ("b".into(), 1)]);
    Ok(())
}

#[tokio::test]
async fn walkthrough_with_remove_policy() -> anyhow::Result<()> {
    let config = CartConfig::default().with_decrement_policy(DecrementPolicy::RemoveAtZero);
    let store = open_store(config).await;

    store.add_to_cart(NewItem::new("a", "T", "u", 10.0)).await?;
    store.add_to_cart(NewItem::new("b", "T", "u", 10.0)).await?;
    store.increment("a").await;
    store.decrement("b").await;

    assert_eq!(lines(&store), vec![("a".into(), 2)]);
    Ok(())
}

#[tokio::test]
async fn invalid_items_are_rejected() {
    let store = open_store(CartConfig::default()).await;

    for item in [
        NewItem::new("", "T", "u", 1.0),
        NewItem::new("x", "T", "u", -1.0),
        NewItem::new("x", "T", "u", f64::NAN),
    ] {
        let err = store.add_to_cart(item).await.unwrap_err();
        assert!(matches!(err, CartError::InvalidItem(_)));
    }
    assert!(store.cart().is_empty());
}

#[tokio::test]
async fn totals_follow_quantities() -> anyhow::Result<()> {
    let store = open_store(CartConfig::default()).await;
    store.add_to_cart(NewItem::new("a", "T", "u", 2.5)).await?;
    store.add_to_cart(NewItem::new("b", "T", "u", 1.0)).await?;
    store.increment("a").await;

    let cart = store.cart();
    assert_eq!(cart.total_quantity(), 3);
    assert_eq!(cart.subtotal(), 6.0);
    Ok(())
}

#[tokio::test]
async fn context_without_store_fails_fast() {
    let context: CartContext<MemoryStorage> = CartContext::empty();
    assert!(matches!(context.store(), Err(CartError::NoStore)));
}
