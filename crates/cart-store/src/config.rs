//! Store configuration.

use std::time::Duration;

use cart_store_core::DecrementPolicy;

/// Storage key used by the original marketplace client.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:cart";

/// Configuration for the Cart Store.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Key the whole cart snapshot is stored under.
    pub storage_key: String,
    /// What decrementing a single-unit line does.
    pub decrement_policy: DecrementPolicy,
    /// How many times a failed snapshot write is retried before it is abandoned.
    pub write_retries: u32,
    /// Delay before the first retry; doubles on every further attempt.
    pub retry_backoff: Duration,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            decrement_policy: DecrementPolicy::ClampAtOne,
            write_retries: 2,
            retry_backoff: Duration::from_millis(50),
        }
    }
}

impl CartConfig {
    /// Use a different storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Use a different decrement policy.
    pub fn with_decrement_policy(mut self, policy: DecrementPolicy) -> Self {
        self.decrement_policy = policy;
        self
    }

    /// Set the retry budget for failed writes.
    pub fn with_write_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.write_retries = retries;
        self.retry_backoff = backoff;
        self
    }

    /// Delay before retry number `attempt` (0-based).
    pub(crate) fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff.saturating_mul(1u32 << attempt.min(16))
    }
}
