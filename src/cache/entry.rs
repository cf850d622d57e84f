//! Cache Entry Module
//!
//! Defines the envelope every cached value is stored in, plus key normalisation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached value together with the time it was written.
///
/// The timestamp is set by the writer, never by the store, so freshness can be
/// checked on read regardless of whether the backend enforces expiry itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Write time (Unix seconds)
    pub timestamp: i64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Wraps a value stamped with the current time.
    pub fn new(value: V) -> Self {
        Self::stored_at(value, current_timestamp())
    }

    /// Wraps a value with an explicit write time.
    pub fn stored_at(value: V, timestamp: i64) -> Self {
        Self { value, timestamp }
    }

    // == Age ==
    /// Seconds elapsed between the write and `now`, clamped at zero.
    pub fn age(&self, now: i64) -> u64 {
        now.saturating_sub(self.timestamp).max(0) as u64
    }

    // == Is Fresh ==
    /// An entry stays valid while `now - timestamp <= ttl`.
    pub fn is_fresh(&self, ttl_seconds: u64, now: i64) -> bool {
        self.age(now) <= ttl_seconds
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Case-folds and trims a raw key.
///
/// Applying it twice yields the same key as applying it once.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}
