//! API Routes
//!
//! Configures the Axum router with all cache endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_geocode_handler, get_map_url_handler, get_photos_handler, health_handler,
    post_geocode_handler, post_map_url_handler, post_photos_handler, prime_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /geocode?key=` / `POST /geocode` - Address coordinates
/// - `GET /map-url?name=&address=` / `POST /map-url` - Map embed URL
/// - `GET /photos?name=&address=` / `POST /photos` - Place photo URLs
/// - `POST /prime` - Sequentially warm caches for a list of places
/// - `GET /stats` - Per-resource cache counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, the site calls these from the browser
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/geocode", get(get_geocode_handler).post(post_geocode_handler))
        .route("/map-url", get(get_map_url_handler).post(post_map_url_handler))
        .route("/photos", get(get_photos_handler).post(post_photos_handler))
        .route("/prime", post(prime_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
