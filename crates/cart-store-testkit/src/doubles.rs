//! Storage doubles.
//!
//! Each double wraps another [`KeyValueStorage`] and changes one aspect of
//! its behaviour. They compose: a `RecordingStorage<SlowStorage<MemoryStorage>>`
//! records writes to a slow in-memory backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use cart_store_storage::{KeyValueStorage, Result, StorageError};
use tokio::sync::watch;

/// Delays every call before forwarding it.
pub struct SlowStorage<S> {
    inner: S,
    get_delay: Duration,
    set_delay: Duration,
}

impl<S: KeyValueStorage> SlowStorage<S> {
    /// Delay writes by `set_delay`; reads are not delayed.
    pub fn new(inner: S, set_delay: Duration) -> Self {
        Self {
            inner,
            get_delay: Duration::ZERO,
            set_delay,
        }
    }

    /// Delay reads as well.
    pub fn with_get_delay(mut self, delay: Duration) -> Self {
        self.get_delay = delay;
        self
    }

    /// The wrapped storage.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: KeyValueStorage> KeyValueStorage for SlowStorage<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        tokio::time::sleep(self.get_delay).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        tokio::time::sleep(self.set_delay).await;
        self.inner.set(key, value).await
    }
}

/// Fails calls on demand.
pub struct FailingStorage<S> {
    inner: S,
    failing_sets: AtomicU64,
    fail_gets: bool,
    set_attempts: AtomicU64,
}

impl<S: KeyValueStorage> FailingStorage<S> {
    /// Fail the next `count` writes, then behave normally.
    pub fn failing_sets(inner: S, count: u64) -> Self {
        Self {
            inner,
            failing_sets: AtomicU64::new(count),
            fail_gets: false,
            set_attempts: AtomicU64::new(0),
        }
    }

    /// Fail every write.
    pub fn always_failing_sets(inner: S) -> Self {
        Self::failing_sets(inner, u64::MAX)
    }

    /// Fail every read.
    pub fn failing_gets(inner: S) -> Self {
        Self {
            inner,
            failing_sets: AtomicU64::new(0),
            fail_gets: true,
            set_attempts: AtomicU64::new(0),
        }
    }

    /// Number of `set` calls seen, failed or not.
    pub fn set_attempts(&self) -> u64 {
        self.set_attempts.load(Ordering::SeqCst)
    }

    /// Stop failing writes.
    pub fn heal(&self) {
        self.failing_sets.store(0, Ordering::SeqCst);
    }

    /// The wrapped storage.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: KeyValueStorage> KeyValueStorage for FailingStorage<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_gets {
            return Err(StorageError::Backend(format!("injected read failure for {key}")));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.set_attempts.fetch_add(1, Ordering::SeqCst);

        let fail = self
            .failing_sets
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                u64::MAX => Some(u64::MAX),
                n => Some(n - 1),
            })
            .is_ok();

        if fail {
            return Err(StorageError::Backend(format!("injected write failure for {key}")));
        }
        self.inner.set(key, value).await
    }
}

/// Records every successful write, in order.
pub struct RecordingStorage<S> {
    inner: S,
    writes: Mutex<Vec<(String, String)>>,
}

impl<S: KeyValueStorage> RecordingStorage<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Every `(key, value)` written so far.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// The wrapped storage.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: KeyValueStorage> KeyValueStorage for RecordingStorage<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.inner.set(key, value.clone()).await?;
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((key.to_string(), value));
        }
        Ok(())
    }
}

/// Holds every write until the gate is opened. Reads pass straight through.
pub struct GatedStorage<S> {
    inner: S,
    gate: watch::Sender<bool>,
}

impl<S: KeyValueStorage> GatedStorage<S> {
    /// Wrap `inner` with a closed gate.
    pub fn new(inner: S) -> Self {
        let (gate, _) = watch::channel(false);
        Self { inner, gate }
    }

    /// Let held and future writes through.
    pub fn open(&self) {
        self.gate.send_replace(true);
    }

    /// The wrapped storage.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn pass(&self) {
        let mut rx = self.gate.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

#[async_trait]
impl<S: KeyValueStorage> KeyValueStorage for GatedStorage<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.pass().await;
        self.inner.set(key, value).await
    }
}
