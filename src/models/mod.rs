//! Request, response and resource models for the cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, and the
//! values each cache holds.

pub mod requests;
pub mod resources;
pub mod responses;

// Re-export commonly used types
pub use requests::{GeocodeQuery, PlaceQuery, PrimeRequest, WriteRequest};
pub use resources::{
    geocode_key, Coordinates, MapEmbed, Place, PlacePhotos, Resource, MAX_PHOTOS,
};
pub use responses::{HealthResponse, StatsResponse, WriteResponse, WriteStatus};
