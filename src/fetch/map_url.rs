//! Map-embed policy
//!
//! Pure computation: the embed URL is a deterministic function of the place.

use async_trait::async_trait;
use reqwest::Url;

use super::FetchPolicy;
use crate::error::{CacheError, Result};
use crate::models::{MapEmbed, Place};

/// Embed endpoint the generated URLs point at
pub const MAP_EMBED_BASE: &str = "https://www.google.com/maps/embed/v1/place";

#[derive(Debug, Clone)]
pub struct MapUrlPolicy {
    api_key: String,
}

impl MapUrlPolicy {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Builds the escaped embed URL for `place`.
    pub fn embed_url(&self, place: &Place) -> Result<String> {
        let query = format!("{}, {}", place.name.trim(), place.address.trim());
        let url = Url::parse_with_params(
            MAP_EMBED_BASE,
            &[("key", self.api_key.as_str()), ("q", query.as_str())],
        )
        .map_err(|e| CacheError::Internal(e.to_string()))?;
        Ok(url.into())
    }
}

#[async_trait]
impl FetchPolicy<Place, MapEmbed> for MapUrlPolicy {
    async fn fetch(&self, place: &Place) -> Result<MapEmbed> {
        Ok(MapEmbed {
            url: self.embed_url(place)?,
        })
    }
}
