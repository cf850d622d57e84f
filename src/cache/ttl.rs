//! TTL Cache Module
//!
//! Generic read-through cache: normalised key, fixed TTL, fetch on miss,
//! best-effort write on fill.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::{
    current_timestamp, normalize_key, CacheEntry, KvStore, ResourceCounters, ResourceStats,
};
use crate::error::{CacheError, Result};
use crate::fetch::FetchPolicy;

// == Lookup ==
/// A value plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookup<V> {
    pub value: V,
    pub from_cache: bool,
    /// Seconds since the entry was written; only set for cache hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age: Option<u64>,
}

impl<V> Lookup<V> {
    pub fn cached(value: V, age: u64) -> Self {
        Self {
            value,
            from_cache: true,
            cache_age: Some(age),
        }
    }

    pub fn fetched(value: V) -> Self {
        Self {
            value,
            from_cache: false,
            cache_age: None,
        }
    }
}

// == Write Outcome ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    /// Written to the store
    Stored,
    /// No store configured; nothing written
    Skipped,
}

// == TTL Cache ==
/// Read-through cache for one resource type.
///
/// `K` is the caller's key type, turned into a raw string by `key_fn` and then
/// normalised. With no store handle every read misses and every write is
/// skipped, which callers cannot tell apart from a cold cache.
pub struct TtlCache<K: ?Sized, V> {
    namespace: &'static str,
    ttl_seconds: u64,
    key_fn: fn(&K) -> String,
    store: Option<Arc<dyn KvStore>>,
    counters: ResourceCounters,
    _value: PhantomData<fn() -> V>,
}

impl<K, V> TtlCache<K, V>
where
    K: ?Sized + Sync,
    V: Serialize + DeserializeOwned + Send + Sync,
{
    // == Constructor ==
    pub fn new(
        namespace: &'static str,
        ttl_seconds: u64,
        key_fn: fn(&K) -> String,
        store: Option<Arc<dyn KvStore>>,
    ) -> Self {
        Self {
            namespace,
            ttl_seconds,
            key_fn,
            store,
            counters: ResourceCounters::new(),
            _value: PhantomData,
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Normalised key, without the namespace.
    pub fn normalized_key(&self, key: &K) -> String {
        normalize_key(&(self.key_fn)(key))
    }

    fn store_key(&self, key: &K) -> String {
        format!("{}:{}", self.namespace, self.normalized_key(key))
    }

    // == Get ==
    /// Returns the cached value if one exists and is still within the TTL.
    pub async fn get(&self, key: &K) -> Option<Lookup<V>> {
        let found = self.read_fresh(key).await;
        match &found {
            Some(_) => self.counters.record_hit(),
            None => self.counters.record_miss(),
        }
        found
    }

    async fn read_fresh(&self, key: &K) -> Option<Lookup<V>> {
        let store = self.store.as_ref()?;
        let store_key = self.store_key(key);

        let raw = match store.get(&store_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %store_key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key = %store_key, error = %e, "store read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry<V> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %store_key, error = %e, "undecodable cache entry, treating as miss");
                return None;
            }
        };

        let now = current_timestamp();
        let age = entry.age(now);
        if !entry.is_fresh(self.ttl_seconds, now) {
            debug!(key = %store_key, age, "cache entry stale");
            return None;
        }

        debug!(key = %store_key, age, "cache hit");
        Some(Lookup::cached(entry.value, age))
    }

    // == Set ==
    /// Writes `value` stamped with the current time, expiring after the TTL.
    ///
    /// `Skipped` when there is no store; `StoreUnavailable` when the write fails.
    pub async fn set(&self, key: &K, value: &V) -> Result<WriteOutcome> {
        let Some(store) = self.store.as_ref() else {
            self.counters.record_write(false);
            return Ok(WriteOutcome::Skipped);
        };

        let store_key = self.store_key(key);
        let payload = serde_json::to_string(&CacheEntry::new(value))
            .map_err(|e| CacheError::Internal(e.to_string()))?;

        match store.set(&store_key, payload, self.ttl_seconds).await {
            Ok(()) => {
                self.counters.record_write(true);
                debug!(key = %store_key, ttl = self.ttl_seconds, "cache entry stored");
                Ok(WriteOutcome::Stored)
            }
            Err(e) => {
                self.counters.record_write(false);
                Err(CacheError::StoreUnavailable(e.to_string()))
            }
        }
    }

    // == Get Or Fetch ==
    /// Serves a fresh cached value, or asks `policy` exactly once and caches
    /// what it returns. Write failures are logged, never returned.
    pub async fn get_or_fetch<P>(&self, key: &K, policy: &P) -> Result<Lookup<V>>
    where
        P: FetchPolicy<K, V> + ?Sized,
    {
        if let Some(hit) = self.get(key).await {
            return Ok(hit);
        }

        let fetched = policy.fetch(key).await;
        self.counters.record_fetch(fetched.is_ok());
        let value = fetched?;

        // Awaited so the next read of this key hits; a failed write never
        // reaches the caller.
        if let Err(e) = self.set(key, &value).await {
            warn!(namespace = self.namespace, error = %e, "cache fill failed");
        }

        Ok(Lookup::fetched(value))
    }

    pub fn stats(&self) -> ResourceStats {
        self.counters.snapshot()
    }
}
