//! Hydration, round trips and write-failure recovery.

use std::sync::Arc;
use std::time::Duration;

use cart_store::core::{decode_snapshot, encode_snapshot, Cart, SnapshotFormat};
use cart_store::storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
use cart_store::{CartConfig, CartStore, HydrationOutcome, NewItem, DEFAULT_STORAGE_KEY};
use cart_store_testkit::{
    any_price, catalogue, legacy_snapshot, sample_item, FailingStorage, SlowStorage,
};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn fast_retries() -> CartConfig {
    CartConfig::default().with_write_retries(1, Duration::from_millis(1))
}

async fn stored_cart<S: KeyValueStorage>(storage: &S) -> Option<Cart> {
    let raw = storage.get(DEFAULT_STORAGE_KEY).await.ok()??;
    decode_snapshot(&raw).ok().map(|(cart, _)| cart)
}

#[tokio::test]
async fn snapshot_round_trips_through_shared_storage() -> anyhow::Result<()> {
    init_tracing();
    let storage = Arc::new(MemoryStorage::new());

    let first = CartStore::with_shared(Arc::clone(&storage), CartConfig::default())?;
    first.ready().await;
    for item in catalogue() {
        first.add_to_cart(item).await?;
    }
    first.increment("2").await;
    first.increment("2").await;
    first.decrement("2").await;
    let expected = first.cart();
    first.flush().await;
    drop(first);

    let second = CartStore::with_shared(Arc::clone(&storage), CartConfig::default())?;
    let outcome = second.ready().await;

    assert_eq!(
        outcome,
        HydrationOutcome::Restored {
            items: 4,
            format: SnapshotFormat::Envelope
        }
    );
    assert!(second.is_hydrated());
    assert_eq!(second.cart(), expected);
    Ok(())
}

#[tokio::test]
async fn snapshot_survives_sqlite_reopen() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cart.db");

    let expected = {
        let store = CartStore::open(SqliteStorage::open(&path)?, CartConfig::default()).await?;
        store.add_to_cart(sample_item("a")).await?;
        store.add_to_cart(sample_item("b")).await?;
        store.increment("a").await;
        let status = store.flush().await;
        assert!(status.is_synced());
        store.cart()
    };

    let reopened = CartStore::open(SqliteStorage::open(&path)?, CartConfig::default()).await?;
    assert_eq!(reopened.cart(), expected);
    Ok(())
}

#[tokio::test]
async fn custom_storage_key_is_used() -> anyhow::Result<()> {
    let storage = Arc::new(MemoryStorage::new());
    let config = CartConfig::default().with_storage_key("@tests:cart");

    let store = CartStore::with_shared(Arc::clone(&storage), config)?;
    store.add_to_cart(sample_item("a")).await?;
    store.flush().await;

    assert!(storage.peek("@tests:cart").is_some());
    assert!(storage.peek(DEFAULT_STORAGE_KEY).is_none());
    Ok(())
}

#[tokio::test]
async fn legacy_snapshot_is_restored_and_rewritten() -> anyhow::Result<()> {
    let storage = Arc::new(MemoryStorage::with_value(DEFAULT_STORAGE_KEY, legacy_snapshot()));

    let store = CartStore::with_shared(Arc::clone(&storage), CartConfig::default())?;
    assert_eq!(
        store.ready().await,
        HydrationOutcome::Restored {
            items: 2,
            format: SnapshotFormat::Legacy
        }
    );
    assert_eq!(store.cart().get("1").map(|i| i.quantity), Some(2));

    store.increment("3").await;
    store.flush().await;

    let raw = storage.peek(DEFAULT_STORAGE_KEY).expect("snapshot stored");
    let (cart, format) = decode_snapshot(&raw)?;
    assert_eq!(format, SnapshotFormat::Envelope);
    assert_eq!(cart.get("3").map(|i| i.quantity), Some(2));
    Ok(())
}

#[tokio::test]
async fn corrupt_snapshot_starts_empty() -> anyhow::Result<()> {
    init_tracing();
    let storage = MemoryStorage::with_value(DEFAULT_STORAGE_KEY, "{\"items\": [oops");

    let store = CartStore::open(storage, CartConfig::default()).await?;

    assert!(matches!(
        store.hydration(),
        Some(HydrationOutcome::Corrupt { .. })
    ));
    assert!(!store.is_hydrated());
    assert!(store.cart().is_empty());

    store.add_to_cart(sample_item("a")).await?;
    store.flush().await;
    let stored = stored_cart(store.storage()).await.expect("rewritten");
    assert_eq!(stored, store.cart());
    Ok(())
}

#[tokio::test]
async fn tampered_snapshot_is_treated_as_corrupt() -> anyhow::Result<()> {
    let mut cart = Cart::new();
    cart.add(sample_item("a"));
    let raw = encode_snapshot(&cart)?.replace("\"quantity\":1", "\"quantity\":50");

    let store = CartStore::open(
        MemoryStorage::with_value(DEFAULT_STORAGE_KEY, raw),
        CartConfig::default(),
    )
    .await?;

    assert!(matches!(
        store.hydration(),
        Some(HydrationOutcome::Corrupt { .. })
    ));
    assert!(store.cart().is_empty());
    Ok(())
}

#[tokio::test]
async fn unreadable_storage_starts_empty() -> anyhow::Result<()> {
    init_tracing();
    let storage = FailingStorage::failing_gets(MemoryStorage::new());

    let store = CartStore::open(storage, CartConfig::default()).await?;

    assert!(matches!(
        store.hydration(),
        Some(HydrationOutcome::Unavailable { .. })
    ));
    store.add_to_cart(sample_item("a")).await?;
    assert!(store.flush().await.is_synced());
    Ok(())
}

#[tokio::test]
async fn mutations_wait_for_hydration() -> anyhow::Result<()> {
    let mut stored = Cart::new();
    stored.add(sample_item("a"));
    stored.increment("a");
    let storage = SlowStorage::new(
        MemoryStorage::with_value(DEFAULT_STORAGE_KEY, encode_snapshot(&stored)?),
        Duration::ZERO,
    )
    .with_get_delay(Duration::from_millis(50));

    let store = CartStore::new(storage, CartConfig::default())?;
    assert!(store.hydration().is_none());

    store.increment("a").await;
    store.add_to_cart(sample_item("b")).await?;

    let cart = store.cart();
    assert_eq!(cart.get("a").map(|i| i.quantity), Some(3));
    assert_eq!(cart.position("b"), Some(1));
    Ok(())
}

#[tokio::test]
async fn failed_writes_keep_memory_and_do_not_block() -> anyhow::Result<()> {
    init_tracing();
    let storage = Arc::new(FailingStorage::always_failing_sets(MemoryStorage::new()));
    let store = CartStore::with_shared(Arc::clone(&storage), fast_retries())?;

    store.add_to_cart(sample_item("a")).await?;
    let status = store.flush().await;

    assert_eq!(status.published, 1);
    assert_eq!(status.written, 0);
    assert_eq!(status.failed_writes, 2);
    assert_eq!(status.abandoned, 1);
    assert!(status.last_error.is_some());
    assert_eq!(store.cart().len(), 1);

    store.increment("a").await;
    assert_eq!(store.cart().get("a").map(|i| i.quantity), Some(2));

    storage.heal();
    store.add_to_cart(sample_item("b")).await?;
    let status = store.flush().await;
    assert!(status.is_synced());

    let persisted = stored_cart(storage.inner()).await.expect("written after heal");
    assert_eq!(persisted, store.cart());
    Ok(())
}

#[tokio::test]
async fn transient_write_failure_is_retried() -> anyhow::Result<()> {
    let storage = Arc::new(FailingStorage::failing_sets(MemoryStorage::new(), 1));
    let store = CartStore::with_shared(Arc::clone(&storage), fast_retries())?;

    store.add_to_cart(NewItem::new("a", "T", "u", 3.0)).await?;
    let status = store.flush().await;

    assert!(status.is_synced());
    assert_eq!(status.failed_writes, 1);
    assert_eq!(status.abandoned, 0);
    assert_eq!(storage.set_attempts(), 2);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_valid_price_survives_restart(prices in prop::collection::vec(any_price(), 1..6)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");

        let (expected, outcome, restored) = runtime.block_on(async {
            let storage = Arc::new(MemoryStorage::new());

            let first = CartStore::with_shared(Arc::clone(&storage), CartConfig::default())
                .expect("store");
            for (n, price) in prices.iter().enumerate() {
                let item = NewItem::new(format!("sku-{n}"), "Product", "https://cdn.example.com/p.png", *price);
                first.add_to_cart(item).await.expect("valid item");
            }
            first.flush().await;
            let expected = first.cart();
            drop(first);

            let second = CartStore::with_shared(Arc::clone(&storage), CartConfig::default())
                .expect("store");
            let outcome = second.ready().await;
            (expected, outcome, second.cart())
        });

        prop_assert_eq!(
            outcome,
            HydrationOutcome::Restored { items: prices.len(), format: SnapshotFormat::Envelope }
        );
        prop_assert_eq!(restored, expected);
    }
}
