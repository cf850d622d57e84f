//! Cached resource types
//!
//! The values each cache holds and the key they are looked up by.

use serde::{Deserialize, Serialize};

/// A restaurant, identified by display name and street address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
}

impl Place {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Raw map-embed cache key: `name|address`
    pub fn map_url_key(&self) -> String {
        format!("{}|{}", self.name.trim(), self.address.trim())
    }

    /// Raw photos cache key: `name-address`
    pub fn photos_key(&self) -> String {
        format!("{}-{}", self.name.trim(), self.address.trim())
    }

    /// Free-text query handed to place search.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.name.trim(), self.address.trim())
    }
}

/// Raw geocode cache key: the address itself.
pub fn geocode_key(address: &str) -> String {
    address.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEmbed {
    pub url: String,
}

/// Up to `MAX_PHOTOS` resolved photo URLs. An empty list is a real answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacePhotos {
    pub photos: Vec<String>,
}

/// Photo references resolved per place.
pub const MAX_PHOTOS: usize = 6;

/// The cached resource types, as named in prime requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Geocode,
    MapUrl,
    Photos,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Geocode, Resource::MapUrl, Resource::Photos];
}
