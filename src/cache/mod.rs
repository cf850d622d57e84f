//! Cache Module
//!
//! Read-through TTL caches over a pluggable key-value store.

mod entry;
mod lru;
mod redis_store;
mod stats;
mod store;
mod ttl;


// Re-export public types
pub use entry::{current_timestamp, normalize_key, CacheEntry};
pub use lru::LruTracker;
pub use redis_store::RedisStore;
pub use stats::{ResourceCounters, ResourceStats, StoreStats};
pub use store::{KvStore, MemoryStore};
pub use ttl::{Lookup, TtlCache, WriteOutcome};

// == Public Constants ==
/// Maximum allowed store key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;

/// Maximum allowed serialized entry size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
