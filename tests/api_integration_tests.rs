//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wingcache::api::create_router;
use wingcache::cache::{KvStore, MemoryStore};
use wingcache::config::{Config, StoreBackend};
use wingcache::error::{CacheError, Result};
use wingcache::fetch::{FetchPolicy, MapUrlPolicy};
use wingcache::models::{Coordinates, Place, PlacePhotos};
use wingcache::{AppState, CacheOrchestrator, Policies};

// == Stub Policies ==

#[derive(Default)]
struct CountingGeocoder {
    calls: AtomicUsize,
}

#[async_trait]
impl FetchPolicy<str, Coordinates> for CountingGeocoder {
    async fn fetch(&self, address: &str) -> Result<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match address {
            a if a.contains("Atlantis") => Err(CacheError::NotFound(a.to_string())),
            a if a.contains("denied") => Err(CacheError::Provider("REQUEST_DENIED".into())),
            _ => Ok(Coordinates {
                lat: 40.7,
                lng: -74.0,
            }),
        }
    }
}

struct StubPhotos;

#[async_trait]
impl FetchPolicy<Place, PlacePhotos> for StubPhotos {
    async fn fetch(&self, place: &Place) -> Result<PlacePhotos> {
        Ok(PlacePhotos {
            photos: vec![format!("https://photos.example/{}.jpg", place.name)],
        })
    }
}

// == Helper Functions ==

fn build_app(store: Option<Arc<dyn KvStore>>) -> (Router, Arc<CountingGeocoder>) {
    let geocoder = Arc::new(CountingGeocoder::default());
    let policies = Policies {
        geocode: geocoder.clone(),
        map_url: Arc::new(MapUrlPolicy::new("test-key")),
        photos: Arc::new(StubPhotos),
    };
    let orchestrator = CacheOrchestrator::new(store, policies, Duration::ZERO);
    (create_router(AppState::new(orchestrator)), geocoder)
}

fn create_test_app() -> (Router, Arc<CountingGeocoder>) {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new(100));
    build_app(Some(store))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Geocode Endpoint Tests ==

#[tokio::test]
async fn test_geocode_miss_then_hit() {
    let (app, geocoder) = create_test_app();

    let (status, first) = get(&app, "/geocode?key=123%20Main%20St%2C%20NYC").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["value"]["lat"], 40.7);
    assert_eq!(first["fromCache"], false);
    assert!(first.get("cacheAge").is_none());

    let (status, second) = get(&app, "/geocode?key=123%20MAIN%20ST%2C%20NYC").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["value"]["lng"], -74.0);
    assert_eq!(second["fromCache"], true);
    assert!(second["cacheAge"].as_u64().unwrap() <= 1);

    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_geocode_address_alias() {
    let (app, _) = create_test_app();

    let (status, body) = get(&app, "/geocode?address=1%20Main%20St").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fromCache"], false);
}

#[tokio::test]
async fn test_geocode_error_taxonomy() {
    let (app, _) = create_test_app();

    let (status, body) = get(&app, "/geocode").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("address"));

    let (status, _) = get(&app, "/geocode?key=Atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/geocode?key=denied%20st").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_geocode_write_through() {
    let (app, geocoder) = create_test_app();

    let (status, body) = post(
        &app,
        "/geocode",
        json!({"key": " 9 Bleecker St ", "value": {"lat": 40.72, "lng": -73.99}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "9 bleecker st");
    assert_eq!(body["outcome"], "stored");

    let (_, hit) = get(&app, "/geocode?key=9%20bleecker%20st").await;
    assert_eq!(hit["fromCache"], true);
    assert_eq!(hit["value"]["lat"], 40.72);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
}

// == Store Unavailable ==

#[tokio::test]
async fn test_without_store_requests_still_succeed() {
    let (app, geocoder) = build_app(None);

    for _ in 0..2 {
        let (status, body) = get(&app, "/geocode?key=1%20Main%20St").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fromCache"], false);
    }
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);

    let (status, body) = post(
        &app,
        "/geocode",
        json!({"key": "1 Main St", "value": {"lat": 1.0, "lng": 2.0}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "skipped");
}

// == Map URL and Photos Endpoint Tests ==

#[tokio::test]
async fn test_map_url_lookup() {
    let (app, _) = create_test_app();

    let (status, body) = get(&app, "/map-url?name=Sweet%20Chick&address=164%20Bedford%20Ave").await;
    assert_eq!(status, StatusCode::OK);
    let url = body["value"]["url"].as_str().unwrap();
    assert!(url.starts_with("https://www.google.com/maps/embed/v1/place?"));
    assert!(url.contains("q=Sweet+Chick%2C+164+Bedford+Ave"));

    let (_, again) = get(&app, "/map-url?name=sweet%20chick&address=164%20bedford%20ave").await;
    assert_eq!(again["fromCache"], true);
}

#[tokio::test]
async fn test_place_lookup_requires_both_parts() {
    let (app, _) = create_test_app();

    let (status, _) = get(&app, "/photos?name=Sweet%20Chick").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/map-url?address=1%20Main%20St").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_photos_write_through_then_read() {
    let (app, _) = create_test_app();

    let (status, body) = post(
        &app,
        "/photos",
        json!({
            "key": {"name": "Atomic Wings", "address": "528 9th Ave"},
            "value": {"photos": ["https://photos.example/a.jpg", "https://photos.example/b.jpg"]}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "atomic wings-528 9th ave");

    let (_, hit) = get(&app, "/photos?name=Atomic%20Wings&address=528%209th%20Ave").await;
    assert_eq!(hit["fromCache"], true);
    assert_eq!(hit["value"]["photos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_photos_write_through_caps_list() {
    let (app, _) = create_test_app();
    let urls: Vec<String> = (0..10)
        .map(|i| format!("https://photos.example/{}.jpg", i))
        .collect();

    let (status, body) = post(
        &app,
        "/photos",
        json!({
            "key": {"name": "Wing", "address": "1 Main St"},
            "value": {"photos": urls}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "stored");

    let (_, hit) = get(&app, "/photos?name=Wing&address=1%20Main%20St").await;
    assert_eq!(hit["fromCache"], true);
    assert_eq!(hit["value"]["photos"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_malformed_write_body_gets_json_error() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/geocode")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"key": "1 Main St", "value": "nope"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_json(response.into_body()).await;
    assert!(body["error"].is_string());
}

// == Prime Endpoint Tests ==

#[tokio::test]
async fn test_prime_reports_each_key() {
    let (app, _) = create_test_app();

    let (status, report) = post(
        &app,
        "/prime",
        json!({
            "places": [
                {"name": "Good Wings", "address": "1 Main St"},
                {"name": "Lost Wings", "address": "Atlantis"}
            ],
            "resources": ["geocode", "map-url", "photos"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let succeeded = report["succeeded"].as_array().unwrap();
    assert_eq!(succeeded.len(), 5);
    assert!(succeeded.contains(&json!("mapurl:good wings|1 main st")));
    let failed = report["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["key"], "geocode:atlantis");

    // primed keys are now served from cache
    let (_, hit) = get(&app, "/photos?name=Good%20Wings&address=1%20Main%20St").await;
    assert_eq!(hit["fromCache"], true);
}

// == Stats and Health ==

#[tokio::test]
async fn test_stats_endpoint() {
    let (app, _) = create_test_app();

    get(&app, "/geocode?key=1%20Main%20St").await;
    get(&app, "/geocode?key=1%20Main%20St").await;

    let (status, json) = get(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["backend"], "memory");
    assert_eq!(json["geocode"]["hits"], 1);
    assert_eq!(json["geocode"]["misses"], 1);
    assert_eq!(json["geocode"]["fetches"], 1);
    assert_eq!(json["store"]["total_entries"], 1);
    assert_eq!(json["photos"]["hits"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let (status, json) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Full Stack Against A Mock Provider ==

#[tokio::test]
async fn test_live_policies_against_mock_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "123 Main St, NYC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{"geometry": {"location": {"lat": 40.7, "lng": -74.0}}}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/findplacefromtext/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "candidates": [{"place_id": "pid-9"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {"photos": [{"photo_reference": "ok"}, {"photo_reference": "gone"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/photo"))
        .and(query_param("photo_reference", "ok"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "https://lh3.example/ok.jpg"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/photo"))
        .and(query_param("photo_reference", "gone"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let config = Config {
        store_backend: StoreBackend::Memory,
        maps_api_key: "test-key".to_string(),
        maps_api_base: server.uri(),
        ..Config::default()
    };
    let app = create_router(AppState::from_config(&config).await.unwrap());

    let (status, first) = get(&app, "/geocode?key=123%20Main%20St%2C%20NYC").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["fromCache"], false);
    let (_, second) = get(&app, "/geocode?key=123%20Main%20St%2C%20NYC").await;
    assert_eq!(second["fromCache"], true);
    assert_eq!(second["value"]["lat"], 40.7);

    let (status, photos) = get(&app, "/photos?name=Bonnie%27s&address=398%20Rogers%20Ave").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(photos["value"]["photos"], json!(["https://lh3.example/ok.jpg"]));
}
