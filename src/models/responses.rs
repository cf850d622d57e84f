//! Response DTOs for the cache API
//!
//! Lookups are returned as `cache::Lookup` directly; the rest live here.

use serde::Serialize;

use crate::cache::{ResourceStats, StoreStats, WriteOutcome};
use crate::error::CacheError;

/// What happened to a write-through value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Stored,
    Skipped,
    /// The store rejected or could not take the write
    Failed,
}

impl From<&std::result::Result<WriteOutcome, CacheError>> for WriteStatus {
    fn from(result: &std::result::Result<WriteOutcome, CacheError>) -> Self {
        match result {
            Ok(WriteOutcome::Stored) => WriteStatus::Stored,
            Ok(WriteOutcome::Skipped) => WriteStatus::Skipped,
            Err(_) => WriteStatus::Failed,
        }
    }
}

/// Response body for the write-through endpoints
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// Normalised key the value was written under
    pub key: String,
    pub outcome: WriteStatus,
}

impl WriteResponse {
    pub fn new(key: impl Into<String>, outcome: WriteStatus) -> Self {
        Self {
            key: key.into(),
            outcome,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Configured store backend, `none` when running without one
    pub backend: String,
    /// Backend metrics when the backend keeps them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreStats>,
    pub geocode: ResourceStats,
    pub map_url: ResourceStats,
    pub photos: ResourceStats,
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
