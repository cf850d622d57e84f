//! Geocoding policy
//!
//! Resolves an address to coordinates via the geocoding web service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::FetchPolicy;
use crate::error::{CacheError, Result};
use crate::models::Coordinates;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

/// Looks addresses up with `GET {base}/geocode/json`.
#[derive(Debug, Clone)]
pub struct GeocodePolicy {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeocodePolicy {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Maps a decoded provider answer onto the cache's error taxonomy.
    fn interpret(address: &str, response: GeocodeResponse) -> Result<Coordinates> {
        match response.status.as_str() {
            "OK" => response
                .results
                .into_iter()
                .next()
                .map(|result| result.geometry.location)
                .ok_or_else(|| {
                    CacheError::Provider(format!("OK status without results for '{}'", address))
                }),
            "ZERO_RESULTS" => Err(CacheError::NotFound(format!(
                "no geocode for '{}'",
                address
            ))),
            status => {
                let detail = response.error_message.unwrap_or_default();
                warn!(status, detail = %detail, "geocoding rejected");
                Err(CacheError::Provider(format!(
                    "geocoding failed with status {}",
                    status
                )))
            }
        }
    }
}

#[async_trait]
impl FetchPolicy<str, Coordinates> for GeocodePolicy {
    async fn fetch(&self, address: &str) -> Result<Coordinates> {
        let url = format!("{}/geocode/json", self.base_url);
        debug!(address, "geocoding address");

        let response: GeocodeResponse = self
            .client
            .get(&url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Self::interpret(address, response)
    }
}
