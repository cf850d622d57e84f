//! Fetch Policies
//!
//! What each cache does on a miss. Every policy is a single-shot call with no
//! retry; failures are returned to the caller, never cached.

mod geocode;
mod map_url;
mod photos;

use async_trait::async_trait;

use crate::error::Result;

pub use geocode::GeocodePolicy;
pub use map_url::MapUrlPolicy;
pub use photos::PhotosPolicy;

/// Default Google Maps web-service root
pub const DEFAULT_MAPS_API_BASE: &str = "https://maps.googleapis.com/maps/api";

/// Resource-specific way of producing a value on cache miss.
#[async_trait]
pub trait FetchPolicy<K: ?Sized + Sync, V: Send>: Send + Sync {
    async fn fetch(&self, key: &K) -> Result<V>;
}
