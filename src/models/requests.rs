//! Request DTOs for the cache API
//!
//! Defines the structure of incoming query strings and bodies.

use serde::Deserialize;

use crate::models::{Place, Resource};

/// Query for `GET /geocode?key=<address>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeQuery {
    /// The address to geocode
    #[serde(default, alias = "address")]
    pub key: String,
}

/// Query for `GET /map-url` and `GET /photos`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl From<PlaceQuery> for Place {
    fn from(query: PlaceQuery) -> Self {
        Place::new(query.name, query.address)
    }
}

/// Body for the write-through endpoints: a value the caller already has.
///
/// Used when the browser geocoded an address itself and hands the result back.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteRequest<K, V> {
    pub key: K,
    pub value: V,
}

/// Body for `POST /prime`
#[derive(Debug, Clone, Deserialize)]
pub struct PrimeRequest {
    pub places: Vec<Place>,
    /// Resource types to warm, all of them when omitted
    #[serde(default = "all_resources")]
    pub resources: Vec<Resource>,
}

fn all_resources() -> Vec<Resource> {
    Resource::ALL.to_vec()
}
