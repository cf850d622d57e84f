//! Place-photos policy
//!
//! Three sequential calls: place search, place details, then one photo
//! request per reference whose redirect target becomes the stable URL.

use async_trait::async_trait;
use reqwest::{header::LOCATION, redirect, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use super::FetchPolicy;
use crate::error::{CacheError, Result};
use crate::models::{Place, PlacePhotos, MAX_PHOTOS};

/// Requested photo width in pixels
const PHOTO_MAX_WIDTH: u32 = 800;

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    status: String,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<Details>,
}

#[derive(Debug, Default, Deserialize)]
struct Details {
    #[serde(default)]
    photos: Vec<PhotoRef>,
}

#[derive(Debug, Deserialize)]
struct PhotoRef {
    photo_reference: String,
}

#[derive(Debug, Clone)]
pub struct PhotosPolicy {
    /// Never follows redirects; the `Location` header is the answer
    client: Client,
    base_url: String,
    api_key: String,
}

impl PhotosPolicy {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| CacheError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    // == Step 1 ==
    async fn find_place_id(&self, place: &Place) -> Result<String> {
        let url = format!("{}/place/findplacefromtext/json", self.base_url);
        let text = place.search_text();

        let response: FindPlaceResponse = self
            .client
            .get(&url)
            .query(&[
                ("input", text.as_str()),
                ("inputtype", "textquery"),
                ("fields", "place_id"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => response
                .candidates
                .into_iter()
                .next()
                .map(|c| c.place_id)
                .ok_or_else(|| CacheError::NotFound(format!("no place matches '{}'", text))),
            status => Err(CacheError::Provider(format!(
                "place search failed with status {}",
                status
            ))),
        }
    }

    // == Step 2 ==
    async fn photo_references(&self, place_id: &str) -> Result<Vec<String>> {
        let url = format!("{}/place/details/json", self.base_url);

        let response: DetailsResponse = self
            .client
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", "photos"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            return Err(CacheError::Provider(format!(
                "place details failed with status {}",
                response.status
            )));
        }

        Ok(response
            .result
            .unwrap_or_default()
            .photos
            .into_iter()
            .take(MAX_PHOTOS)
            .map(|p| p.photo_reference)
            .collect())
    }

    // == Step 3 ==
    /// Redirect target for one photo reference, `None` if it cannot be resolved.
    async fn resolve_photo(&self, reference: &str) -> Option<String> {
        let url = format!("{}/place/photo", self.base_url);
        let max_width = PHOTO_MAX_WIDTH.to_string();

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("maxwidth", max_width.as_str()),
                ("photo_reference", reference),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "photo request failed");
                return None;
            }
        };

        if !response.status().is_redirection() {
            debug!(status = %response.status(), "photo reference did not redirect");
            return None;
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

#[async_trait]
impl FetchPolicy<Place, PlacePhotos> for PhotosPolicy {
    async fn fetch(&self, place: &Place) -> Result<PlacePhotos> {
        let place_id = self.find_place_id(place).await?;
        let references = self.photo_references(&place_id).await?;

        let mut photos = Vec::with_capacity(references.len());
        for reference in &references {
            if let Some(url) = self.resolve_photo(reference).await {
                photos.push(url);
            }
        }

        debug!(
            place = %place.name,
            resolved = photos.len(),
            references = references.len(),
            "resolved place photos"
        );
        Ok(PlacePhotos { photos })
    }
}
