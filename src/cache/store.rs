//! Cache Store Module
//!
//! The key-value seam every `TtlCache` writes through, and the in-process backend.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{LruTracker, StoreStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};

// == Store Trait ==
/// Minimal remote key-value contract: string keys, opaque string values,
/// expiry in seconds.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Short backend name for logs and `/stats`.
    fn backend(&self) -> &'static str;

    /// Reads a raw value. `Ok(None)` when absent or already expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites `key` with `value`, expiring after `ttl_seconds`.
    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;

    /// Backend metrics, if the backend keeps any.
    async fn stats(&self) -> Option<StoreStats> {
        None
    }
}

// == Memory Store ==
#[derive(Debug)]
struct Slot {
    value: String,
    /// Unix milliseconds
    expires_at: u64,
}

impl Slot {
    fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Slot>,
    lru: LruTracker,
    stats: StoreStats,
}

impl Inner {
    fn drop_key(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }
}

/// In-process store with native expiry and an LRU bound on entry count.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` keys.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_entries: max_entries.max(1),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, slot)| slot.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.drop_key(key);
        }

        expired.len()
    }

    // == Length ==
    /// Number of entries held, expired or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = current_timestamp_ms();
        // write lock: reads update LRU order and stats
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let live = match inner.entries.get(key) {
            Some(slot) if !slot.is_expired(now) => Some(slot.value.clone()),
            Some(_) => {
                inner.drop_key(key);
                None
            }
            None => None,
        };

        match live {
            Some(value) => {
                inner.stats.record_hit();
                inner.lru.touch(key);
                Ok(Some(value))
            }
            None => {
                inner.stats.record_miss();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::Validation(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::Validation(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        if !inner.entries.contains_key(key) && inner.entries.len() >= self.max_entries {
            match inner.lru.evict_oldest() {
                Some(evicted) => {
                    inner.entries.remove(&evicted);
                    inner.stats.record_eviction();
                }
                None => {
                    return Err(CacheError::Internal(
                        "Store is full and eviction failed".to_string(),
                    ))
                }
            }
        }

        let expires_at = current_timestamp_ms().saturating_add(ttl_seconds.saturating_mul(1000));
        inner.entries.insert(key.to_string(), Slot { value, expires_at });
        inner.lru.touch(key);
        inner.stats.set_total_entries(inner.entries.len());

        Ok(())
    }

    async fn stats(&self) -> Option<StoreStats> {
        let inner = self.inner.read().await;
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        Some(stats)
    }
}

/// Returns current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
