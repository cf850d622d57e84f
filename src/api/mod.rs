//! API Module
//!
//! HTTP handlers and routing for the cache REST API.
//!
//! # Endpoints
//! - `GET|POST /geocode` - Address coordinates
//! - `GET|POST /map-url` - Map embed URLs
//! - `GET|POST /photos` - Place photo URLs
//! - `POST /prime` - Bulk cache warm-up
//! - `GET /stats` - Cache counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
