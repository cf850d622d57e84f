//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use tracing::{info, warn};

use crate::cache::{KvStore, Lookup, MemoryStore, RedisStore};
use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::models::{
    Coordinates, GeocodeQuery, HealthResponse, MapEmbed, Place, PlacePhotos, PlaceQuery,
    PrimeRequest, StatsResponse, WriteRequest, WriteResponse, WriteStatus,
};
use crate::orchestrator::{CacheOrchestrator, Policies, PrimeReport};

/// Application state shared across all handlers.
///
/// The orchestrator and its store handle are built once per process.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<CacheOrchestrator>,
    /// Set when the memory backend is in use, for the expiry sweep
    pub memory_store: Option<Arc<MemoryStore>>,
}

impl AppState {
    /// Creates a new AppState around an already-built orchestrator.
    pub fn new(orchestrator: CacheOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            memory_store: None,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// A redis backend that cannot be reached degrades to running without a
    /// store rather than failing startup.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let policies = Policies::from_config(config)?;
        let mut memory_store = None;

        let store: Option<Arc<dyn KvStore>> = match config.store_backend {
            StoreBackend::Memory => {
                let memory = Arc::new(MemoryStore::new(config.max_entries));
                memory_store = Some(memory.clone());
                Some(memory as Arc<dyn KvStore>)
            }
            StoreBackend::Redis => match config.redis_url.as_deref() {
                Some(url) => match RedisStore::connect(url).await {
                    Ok(redis) => Some(Arc::new(redis) as Arc<dyn KvStore>),
                    Err(e) => {
                        warn!(error = %e, "redis unreachable, running without a cache store");
                        None
                    }
                },
                None => {
                    warn!("STORE_BACKEND=redis but REDIS_URL is unset, running without a cache store");
                    None
                }
            },
            StoreBackend::None => None,
        };

        let orchestrator = CacheOrchestrator::new(store, policies, config.prime_delay());
        info!(backend = orchestrator.backend(), "cache store ready");

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            memory_store,
        })
    }
}

/// Handler for GET /geocode?key=<address>
pub async fn get_geocode_handler(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<Lookup<Coordinates>>> {
    let lookup = state.orchestrator.geocode(&query.key).await?;
    Ok(Json(lookup))
}

/// Handler for POST /geocode
///
/// Accepts coordinates the caller resolved itself.
pub async fn post_geocode_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<WriteRequest<String, Coordinates>>, JsonRejection>,
) -> Result<Json<WriteResponse>> {
    let Json(req) = payload?;
    let (key, outcome) = state.orchestrator.store_geocode(&req.key, &req.value).await?;
    Ok(Json(WriteResponse::new(key, WriteStatus::from(&outcome))))
}

/// Handler for GET /map-url?name=..&address=..
pub async fn get_map_url_handler(
    State(state): State<AppState>,
    Query(query): Query<PlaceQuery>,
) -> Result<Json<Lookup<MapEmbed>>> {
    let lookup = state.orchestrator.map_url(&Place::from(query)).await?;
    Ok(Json(lookup))
}

/// Handler for POST /map-url
pub async fn post_map_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<WriteRequest<Place, MapEmbed>>, JsonRejection>,
) -> Result<Json<WriteResponse>> {
    let Json(req) = payload?;
    let (key, outcome) = state.orchestrator.store_map_url(&req.key, &req.value).await?;
    Ok(Json(WriteResponse::new(key, WriteStatus::from(&outcome))))
}

/// Handler for GET /photos?name=..&address=..
pub async fn get_photos_handler(
    State(state): State<AppState>,
    Query(query): Query<PlaceQuery>,
) -> Result<Json<Lookup<PlacePhotos>>> {
    let lookup = state.orchestrator.photos(&Place::from(query)).await?;
    Ok(Json(lookup))
}

/// Handler for POST /photos
pub async fn post_photos_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<WriteRequest<Place, PlacePhotos>>, JsonRejection>,
) -> Result<Json<WriteResponse>> {
    let Json(req) = payload?;
    let (key, outcome) = state.orchestrator.store_photos(&req.key, &req.value).await?;
    Ok(Json(WriteResponse::new(key, WriteStatus::from(&outcome))))
}

/// Handler for POST /prime
///
/// Runs to completion before answering; large batches take
/// `places * resources * PRIME_DELAY_MS` at least.
pub async fn prime_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PrimeRequest>, JsonRejection>,
) -> Result<Json<PrimeReport>> {
    let Json(req) = payload?;
    Ok(Json(state.orchestrator.prime(&req.places, &req.resources).await))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.orchestrator.stats().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
