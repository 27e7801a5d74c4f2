//! The Cart Store: the authoritative in-memory cart, kept in step with
//! durable storage.
//!
//! Every mutation runs the same critical section under one async mutex:
//! apply the reconciliation rule to the current cart, bump the version,
//! publish the result, queue it for persistence. Holding the mutex across
//! all four steps means operation N+1 always starts from the cart produced
//! by operation N, however the call sites overlap. Writing to storage
//! happens afterwards on the persistence worker, so callers never wait on
//! I/O.
//!
//! Hydration runs once, in the background, right after construction.
//! Mutations issued before it finishes wait for it, then apply on top of
//! the restored cart.

use std::sync::Arc;

use cart_store_core::{
    decode_snapshot, validate_new_item, Cart, CartCoreError, Change, NewItem, SnapshotFormat,
};
use cart_store_storage::KeyValueStorage;
use tokio::sync::{mpsc, watch, Mutex};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::persist::{Pending, PersistWorker, WriterStatus};

/// How hydration ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// A snapshot was found and restored.
    Restored {
        /// Number of lines restored.
        items: usize,
        /// Layout the snapshot was stored in.
        format: SnapshotFormat,
    },
    /// Nothing was stored under the key.
    Empty,
    /// A value was stored but could not be decoded; the cart starts empty.
    Corrupt { reason: String },
    /// Storage could not be read; the cart starts empty.
    Unavailable { reason: String },
}

/// Snapshot of the store's persistence progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistenceStatus {
    /// Version of the most recently published cart. Starts at 0.
    pub published: u64,
    /// Newest version known to be in storage.
    pub written: u64,
    /// Newest version the persistence worker has finished with.
    pub settled: u64,
    /// Failed write attempts, retries included.
    pub failed_writes: u64,
    /// Snapshots given up on after exhausting the retry budget.
    pub abandoned: u64,
    /// Message of the most recent write failure.
    pub last_error: Option<String>,
}

impl PersistenceStatus {
    /// Whether the newest published cart is in storage.
    pub fn is_synced(&self) -> bool {
        self.written == self.published
    }
}

struct State {
    cart: Cart,
    version: u64,
}

struct Inner<S> {
    storage: Arc<S>,
    config: CartConfig,
    state: Mutex<State>,
    published: watch::Sender<Cart>,
    hydration: watch::Sender<Option<HydrationOutcome>>,
    writes: mpsc::UnboundedSender<Pending>,
    writer: watch::Receiver<WriterStatus>,
}

/// Handle to the cart.
///
/// Cheap to clone; every clone shares the same cart. The store is meant to
/// be created once by the application's composition root and handed to
/// whatever needs it.
pub struct CartStore<S: KeyValueStorage + 'static> {
    inner: Arc<Inner<S>>,
}

impl<S: KeyValueStorage + 'static> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStorage + 'static> CartStore<S> {
    /// Create a store and start hydrating it from `storage`.
    ///
    /// The cart is empty until hydration finishes; see [`CartStore::ready`].
    /// Must be called from within a tokio runtime.
    pub fn new(storage: S, config: CartConfig) -> Result<Self> {
        Self::with_shared(Arc::new(storage), config)
    }

    /// Like [`CartStore::new`], for storage that is shared with other users.
    pub fn with_shared(storage: Arc<S>, config: CartConfig) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CartError::Runtime(e.to_string()))?;

        let (published, _) = watch::channel(Cart::new());
        let (hydration, _) = watch::channel(None);
        let (writes, queue) = mpsc::unbounded_channel();
        let (writer_tx, writer) = watch::channel(WriterStatus::default());

        let inner = Arc::new(Inner {
            storage: Arc::clone(&storage),
            config: config.clone(),
            state: Mutex::new(State {
                cart: Cart::new(),
                version: 0,
            }),
            published,
            hydration,
            writes,
            writer,
        });

        runtime.spawn(PersistWorker::new(storage, config, queue, writer_tx).run());
        runtime.spawn(hydrate(Arc::clone(&inner)));

        Ok(Self { inner })
    }

    /// Create a store and wait for hydration to finish.
    pub async fn open(storage: S, config: CartConfig) -> Result<Self> {
        let store = Self::new(storage, config)?;
        store.ready().await;
        Ok(store)
    }

    /// The configuration in use.
    pub fn config(&self) -> &CartConfig {
        &self.inner.config
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Observation
    // ─────────────────────────────────────────────────────────────────────────

    /// The most recently published cart.
    pub fn cart(&self) -> Cart {
        self.inner.published.borrow().clone()
    }

    /// Subscribe to published carts.
    ///
    /// The receiver always holds the latest cart; intermediate states may be
    /// skipped by a slow subscriber.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.published.subscribe()
    }

    /// How hydration ended, or `None` while it is still running.
    pub fn hydration(&self) -> Option<HydrationOutcome> {
        self.inner.hydration.borrow().clone()
    }

    /// Whether a stored cart was restored at startup.
    pub fn is_hydrated(&self) -> bool {
        matches!(self.hydration(), Some(HydrationOutcome::Restored { .. }))
    }

    /// Wait for hydration to finish.
    pub async fn ready(&self) -> HydrationOutcome {
        let mut rx = self.inner.hydration.subscribe();
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| HydrationOutcome::Unavailable {
            reason: "hydration did not complete".into(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add one unit of `item`.
    ///
    /// Unknown ids are appended with quantity 1; known ids have their
    /// quantity bumped and keep their stored title, image and price.
    pub async fn add_to_cart(&self, item: NewItem) -> Result<()> {
        validate_new_item(&item).map_err(|e| match e {
            CartCoreError::InvalidItem(reason) => CartError::InvalidItem(reason),
            other => CartError::Core(other),
        })?;
        let id = item.id.clone();
        self.mutate("add", &id, |cart| cart.add(item)).await;
        Ok(())
    }

    /// Add one unit to the line with `id`. Unknown ids are ignored.
    pub async fn increment(&self, id: &str) {
        self.mutate("increment", id, |cart| cart.increment(id)).await;
    }

    /// Remove one unit from the line with `id`. Unknown ids are ignored.
    ///
    /// What happens to a single-unit line depends on
    /// [`CartConfig::decrement_policy`].
    pub async fn decrement(&self, id: &str) {
        let policy = self.inner.config.decrement_policy;
        self.mutate("decrement", id, |cart| cart.decrement(id, policy))
            .await;
    }

    async fn mutate<F>(&self, op: &'static str, id: &str, apply: F) -> Change
    where
        F: FnOnce(&mut Cart) -> Change,
    {
        self.ready().await;
        let mut state = self.inner.state.lock().await;

        let change = apply(&mut state.cart);
        if !change.is_changed() {
            tracing::debug!(op, id, "cart unchanged");
            return change;
        }

        state.version += 1;
        let version = state.version;
        let cart = state.cart.clone();
        self.inner.published.send_replace(cart.clone());

        if self.inner.writes.send(Pending { version, cart }).is_err() {
            tracing::warn!(op, id, version, "persistence worker is gone, change kept in memory only");
        }

        tracing::debug!(op, id, version, ?change, "cart updated");
        change
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Wait until every cart published before this call has been handled
    /// by the persistence worker: written, or abandoned after its retries.
    pub async fn flush(&self) -> PersistenceStatus {
        let target = self.inner.state.lock().await.version;

        let mut writer = self.inner.writer.clone();
        // An error means the worker is gone; report what it got to.
        let _ = writer.wait_for(|s| s.settled >= target).await;

        self.persistence().await
    }

    /// Current persistence progress.
    pub async fn persistence(&self) -> PersistenceStatus {
        let published = self.inner.state.lock().await.version;
        let writer = self.inner.writer.borrow().clone();

        PersistenceStatus {
            published,
            written: writer.written,
            settled: writer.settled,
            failed_writes: writer.failed_writes,
            abandoned: writer.abandoned,
            last_error: writer.last_error,
        }
    }
}

/// Load the stored snapshot into the cart.
///
/// Holds the state lock for the whole read so nothing can interleave with
/// it. Any failure leaves the cart empty.
async fn hydrate<S: KeyValueStorage + 'static>(inner: Arc<Inner<S>>) {
    let key = inner.config.storage_key.as_str();
    let mut state = inner.state.lock().await;

    let outcome = match inner.storage.get(key).await {
        Ok(None) => {
            tracing::debug!(key, "no stored cart");
            HydrationOutcome::Empty
        }
        Ok(Some(raw)) => match decode_snapshot(&raw) {
            Ok((cart, format)) => {
                let items = cart.len();
                tracing::debug!(key, items, ?format, "cart restored");
                state.cart = cart;
                inner.published.send_replace(state.cart.clone());
                HydrationOutcome::Restored { items, format }
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "stored cart is corrupt, starting empty");
                HydrationOutcome::Corrupt {
                    reason: e.to_string(),
                }
            }
        },
        Err(e) => {
            tracing::warn!(key, error = %e, "cannot read stored cart, starting empty");
            HydrationOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
    };

    inner.hydration.send_replace(Some(outcome));
}
