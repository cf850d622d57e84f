//! Cache Statistics Module
//!
//! Tracks per-resource cache counters and in-memory store metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Store Stats ==
/// Metrics for the in-process store backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries evicted due to LRU policy
    pub evictions: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl StoreStats {
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Resource Stats ==
/// Point-in-time counters for one `TtlCache`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceStats {
    /// Fresh entries served from the store
    pub hits: u64,
    /// Lookups that found nothing fresh
    pub misses: u64,
    /// Fetch policy invocations
    pub fetches: u64,
    /// Fetch policy invocations that returned an error
    pub fetch_failures: u64,
    /// Successful store writes
    pub writes: u64,
    /// Store writes that failed or were skipped for lack of a store
    pub write_failures: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

/// Lock-free counters behind `ResourceStats`.
#[derive(Debug, Default)]
pub struct ResourceCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
    fetch_failures: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
}

impl ResourceCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch(&self, ok: bool) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.fetch_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_write(&self, ok: bool) {
        if ok {
            self.writes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.write_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Takes a consistent-enough snapshot for reporting.
    pub fn snapshot(&self) -> ResourceStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };

        ResourceStats {
            hits,
            misses,
            fetches: self.fetches.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            hit_rate,
        }
    }
}
