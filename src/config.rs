//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::fetch::DEFAULT_MAPS_API_BASE;

/// Which key-value store the caches write through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process map, lost on restart
    Memory,
    /// Remote store at `REDIS_URL`
    Redis,
    /// No store; every lookup is a pass-through fetch
    None,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            "none" | "off" => Ok(StoreBackend::None),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Store the caches write through
    pub store_backend: StoreBackend,
    /// Connection URL for the redis backend
    pub redis_url: Option<String>,
    /// Capacity of the memory backend
    pub max_entries: usize,
    /// Memory backend expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Key for the geocoding, places and embed APIs
    pub maps_api_key: String,
    /// Root URL of the maps web services
    pub maps_api_base: String,
    /// Pause between keys during a bulk prime, in milliseconds
    pub prime_delay_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORE_BACKEND` - `memory`, `redis` or `none` (default: memory)
    /// - `REDIS_URL` - Redis connection URL (required for the redis backend)
    /// - `MAX_ENTRIES` - Memory backend capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - Memory backend sweep in seconds (default: 60)
    /// - `GOOGLE_MAPS_API_KEY` - Maps API key (default: empty)
    /// - `MAPS_API_BASE_URL` - Maps web-service root (default: Google)
    /// - `PRIME_DELAY_MS` - Delay between primed keys (default: 200)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            store_backend: parse_var("STORE_BACKEND").unwrap_or(defaults.store_backend),
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            maps_api_key: env::var("GOOGLE_MAPS_API_KEY").unwrap_or(defaults.maps_api_key),
            maps_api_base: env::var("MAPS_API_BASE_URL").unwrap_or(defaults.maps_api_base),
            prime_delay_ms: parse_var("PRIME_DELAY_MS").unwrap_or(defaults.prime_delay_ms),
        }
    }

    pub fn prime_delay(&self) -> Duration {
        Duration::from_millis(self.prime_delay_ms)
    }
}

/// Reads and parses `name`, ignoring unset or malformed values.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            store_backend: StoreBackend::Memory,
            redis_url: None,
            max_entries: 10_000,
            cleanup_interval: 60,
            maps_api_key: String::new(),
            maps_api_base: DEFAULT_MAPS_API_BASE.to_string(),
            prime_delay_ms: 200,
        }
    }
}
