//! Wingcache - read-through TTL caches for the Chicks of NYC site
//!
//! Geocodes, map-embed URLs and place photos, each cached for a fixed TTL in a
//! pluggable key-value store and fetched from the maps provider on miss.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod orchestrator;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use orchestrator::{CacheOrchestrator, Policies, PrimeReport};
pub use tasks::spawn_cleanup_task;
