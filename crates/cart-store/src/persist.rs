//! Ordered snapshot persistence.
//!
//! Mutations hand every published cart to a single [`PersistWorker`] task
//! through an unbounded channel. The worker writes one snapshot at a time,
//! so writes land in publication order. Before each write it drains the
//! queue and keeps only the newest cart: a snapshot that has been overtaken
//! is never written after its successor.

use std::sync::Arc;

use cart_store_core::{encode_snapshot, Cart};
use cart_store_storage::KeyValueStorage;
use tokio::sync::{mpsc, watch};

use crate::config::CartConfig;

/// A published cart waiting to be written.
#[derive(Debug)]
pub(crate) struct Pending {
    pub version: u64,
    pub cart: Cart,
}

/// Progress of the persistence worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WriterStatus {
    /// Newest version that reached storage.
    pub written: u64,
    /// Newest version the worker is done with, written or not.
    pub settled: u64,
    /// Failed `set` attempts, retries included.
    pub failed_writes: u64,
    /// Snapshots given up on after exhausting the retry budget.
    pub abandoned: u64,
    /// Message of the most recent failure.
    pub last_error: Option<String>,
}

/// Writes published carts to storage in order.
pub(crate) struct PersistWorker<S> {
    storage: Arc<S>,
    config: CartConfig,
    queue: mpsc::UnboundedReceiver<Pending>,
    status: watch::Sender<WriterStatus>,
}

impl<S: KeyValueStorage + 'static> PersistWorker<S> {
    pub fn new(
        storage: Arc<S>,
        config: CartConfig,
        queue: mpsc::UnboundedReceiver<Pending>,
        status: watch::Sender<WriterStatus>,
    ) -> Self {
        Self {
            storage,
            config,
            queue,
            status,
        }
    }

    /// Run until every sender is gone and the queue is empty.
    pub async fn run(mut self) {
        while let Some(pending) = self.queue.recv().await {
            let pending = self.newest(pending);
            self.write(pending).await;
        }
        tracing::debug!(key = %self.config.storage_key, "persistence worker stopped");
    }

    /// Replace `pending` with the newest queued snapshot, if any.
    fn newest(&mut self, mut pending: Pending) -> Pending {
        while let Ok(newer) = self.queue.try_recv() {
            tracing::trace!(
                superseded = pending.version,
                by = newer.version,
                "coalescing snapshot"
            );
            pending = newer;
        }
        pending
    }

    async fn write(&mut self, mut pending: Pending) {
        let mut attempt = 0u32;

        loop {
            let value = match encode_snapshot(&pending.cart) {
                Ok(value) => value,
                Err(e) => {
                    tracing::error!(version = pending.version, error = %e, "cannot encode cart snapshot");
                    self.abandon(pending.version, e.to_string());
                    return;
                }
            };

            match self.storage.set(&self.config.storage_key, value).await {
                Ok(()) => {
                    let version = pending.version;
                    self.status.send_modify(|s| {
                        s.written = version;
                        s.settled = version;
                    });
                    tracing::debug!(
                        key = %self.config.storage_key,
                        version,
                        items = pending.cart.len(),
                        "cart snapshot written"
                    );
                    return;
                }
                Err(e) => {
                    let message = e.to_string();
                    self.status.send_modify(|s| {
                        s.failed_writes += 1;
                        s.last_error = Some(message.clone());
                    });

                    if attempt >= self.config.write_retries {
                        tracing::error!(
                            key = %self.config.storage_key,
                            version = pending.version,
                            attempts = attempt + 1,
                            error = %message,
                            "abandoning cart snapshot"
                        );
                        self.abandon(pending.version, message);
                        return;
                    }

                    let delay = self.config.backoff_for(attempt);
                    tracing::warn!(
                        key = %self.config.storage_key,
                        version = pending.version,
                        attempt = attempt + 1,
                        ?delay,
                        error = %message,
                        "cart snapshot write failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;

                    let previous = pending.version;
                    pending = self.newest(pending);
                    if pending.version != previous {
                        attempt = 0;
                    }
                }
            }
        }
    }

    fn abandon(&self, version: u64, message: String) {
        self.status.send_modify(|s| {
            s.settled = version;
            s.abandoned += 1;
            s.last_error = Some(message);
        });
    }
}
