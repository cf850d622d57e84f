//! Cache Orchestrator
//!
//! Binds each resource type to its `TtlCache` and `FetchPolicy`, and walks
//! bulk prime requests one key at a time.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{KvStore, Lookup, TtlCache, WriteOutcome};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{FetchPolicy, GeocodePolicy, MapUrlPolicy, PhotosPolicy};
use crate::models::{
    geocode_key, Coordinates, MapEmbed, Place, PlacePhotos, Resource, StatsResponse, MAX_PHOTOS,
};

// == TTLs ==
pub const GEOCODE_TTL_SECS: u64 = 30 * 24 * 60 * 60;
pub const MAP_URL_TTL_SECS: u64 = 10 * 24 * 60 * 60;
pub const PHOTOS_TTL_SECS: u64 = 24 * 60 * 60;

// == Policies ==
/// One fetch policy per resource type.
#[derive(Clone)]
pub struct Policies {
    pub geocode: Arc<dyn FetchPolicy<str, Coordinates>>,
    pub map_url: Arc<dyn FetchPolicy<Place, MapEmbed>>,
    pub photos: Arc<dyn FetchPolicy<Place, PlacePhotos>>,
}

impl Policies {
    /// The live maps-provider policies.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            geocode: Arc::new(GeocodePolicy::new(
                config.maps_api_base.clone(),
                config.maps_api_key.clone(),
            )),
            map_url: Arc::new(MapUrlPolicy::new(config.maps_api_key.clone())),
            photos: Arc::new(PhotosPolicy::new(
                config.maps_api_base.clone(),
                config.maps_api_key.clone(),
            )?),
        })
    }
}

// == Prime Report ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimeFailure {
    pub key: String,
    pub error: String,
}

/// Outcome of a bulk prime; one entry per store key (`namespace:key`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrimeReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<PrimeFailure>,
}

// == Orchestrator ==
pub struct CacheOrchestrator {
    store: Option<Arc<dyn KvStore>>,
    geocode: TtlCache<str, Coordinates>,
    map_url: TtlCache<Place, MapEmbed>,
    photos: TtlCache<Place, PlacePhotos>,
    policies: Policies,
    prime_delay: Duration,
}

impl CacheOrchestrator {
    /// Builds the three caches over one shared store handle.
    pub fn new(store: Option<Arc<dyn KvStore>>, policies: Policies, prime_delay: Duration) -> Self {
        Self {
            geocode: TtlCache::new("geocode", GEOCODE_TTL_SECS, geocode_key, store.clone()),
            map_url: TtlCache::new("mapurl", MAP_URL_TTL_SECS, Place::map_url_key, store.clone()),
            photos: TtlCache::new("photos", PHOTOS_TTL_SECS, Place::photos_key, store.clone()),
            store,
            policies,
            prime_delay,
        }
    }

    // == Lookups ==
    pub async fn geocode(&self, address: &str) -> Result<Lookup<Coordinates>> {
        require("address", address)?;
        self.geocode
            .get_or_fetch(address, self.policies.geocode.as_ref())
            .await
    }

    pub async fn map_url(&self, place: &Place) -> Result<Lookup<MapEmbed>> {
        require_place(place)?;
        self.map_url
            .get_or_fetch(place, self.policies.map_url.as_ref())
            .await
    }

    pub async fn photos(&self, place: &Place) -> Result<Lookup<PlacePhotos>> {
        require_place(place)?;
        self.photos
            .get_or_fetch(place, self.policies.photos.as_ref())
            .await
    }

    // == Write-through ==
    /// Stores caller-computed coordinates, returning the normalised key.
    pub async fn store_geocode(
        &self,
        address: &str,
        value: &Coordinates,
    ) -> Result<(String, Result<WriteOutcome>)> {
        require("address", address)?;
        let key = self.geocode.normalized_key(address);
        Ok((key, self.geocode.set(address, value).await))
    }

    pub async fn store_map_url(
        &self,
        place: &Place,
        value: &MapEmbed,
    ) -> Result<(String, Result<WriteOutcome>)> {
        require_place(place)?;
        let key = self.map_url.normalized_key(place);
        Ok((key, self.map_url.set(place, value).await))
    }

    pub async fn store_photos(
        &self,
        place: &Place,
        value: &PlacePhotos,
    ) -> Result<(String, Result<WriteOutcome>)> {
        require_place(place)?;
        if value.photos.len() > MAX_PHOTOS {
            debug!(count = value.photos.len(), "truncating written photo list");
        }
        let capped = PlacePhotos {
            photos: value.photos.iter().take(MAX_PHOTOS).cloned().collect(),
        };
        let key = self.photos.normalized_key(place);
        Ok((key, self.photos.set(place, &capped).await))
    }

    // == Prime ==
    /// Warms `resources` for every place, strictly one key at a time with
    /// `prime_delay` between keys. Individual failures are recorded, never fatal.
    pub async fn prime(&self, places: &[Place], resources: &[Resource]) -> PrimeReport {
        let mut report = PrimeReport::default();
        let mut first = true;

        info!(places = places.len(), resources = resources.len(), "priming caches");

        for place in places {
            for resource in resources {
                if !first && !self.prime_delay.is_zero() {
                    tokio::time::sleep(self.prime_delay).await;
                }
                first = false;

                let (key, outcome) = self.prime_one(place, *resource).await;
                match outcome {
                    Ok(()) => report.succeeded.push(key),
                    Err(e) => {
                        warn!(key = %key, error = %e, "prime failed");
                        report.failed.push(PrimeFailure {
                            key,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "prime finished"
        );
        report
    }

    async fn prime_one(&self, place: &Place, resource: Resource) -> (String, Result<()>) {
        let (namespace, key, outcome) = match resource {
            Resource::Geocode => (
                self.geocode.namespace(),
                self.geocode.normalized_key(&place.address),
                self.geocode(&place.address).await.map(|_| ()),
            ),
            Resource::MapUrl => (
                self.map_url.namespace(),
                self.map_url.normalized_key(place),
                self.map_url(place).await.map(|_| ()),
            ),
            Resource::Photos => (
                self.photos.namespace(),
                self.photos.normalized_key(place),
                self.photos(place).await.map(|_| ()),
            ),
        };
        // Same prefix as the store key
        (format!("{}:{}", namespace, key), outcome)
    }

    // == Stats ==
    pub fn backend(&self) -> &'static str {
        self.store.as_ref().map(|s| s.backend()).unwrap_or("none")
    }

    pub async fn stats(&self) -> StatsResponse {
        let store = match &self.store {
            Some(store) => store.stats().await,
            None => None,
        };

        StatsResponse {
            backend: self.backend().to_string(),
            store,
            geocode: self.geocode.stats(),
            map_url: self.map_url.stats(),
            photos: self.photos.stats(),
        }
    }
}

// == Validation ==
fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CacheError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn require_place(place: &Place) -> Result<()> {
    require("name", &place.name)?;
    require("address", &place.address)
}
