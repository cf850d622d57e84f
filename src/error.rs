//! Error types for the cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache layer and its fetch policies.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing store is not configured or could not be reached.
    ///
    /// Never surfaces past `TtlCache`; callers see a cache miss instead.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// External provider answered with a non-success status or garbage
    #[error("Provider error: {0}")]
    Provider(String),

    /// Valid request, but the provider has nothing for it
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or empty key components
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Provider(err.to_string())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::StoreUnavailable(err.to_string())
    }
}

impl From<JsonRejection> for CacheError {
    fn from(rejection: JsonRejection) -> Self {
        CacheError::Validation(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::StoreUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::Provider(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache service.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::StoreUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (CacheError::Provider("x".into()), StatusCode::BAD_GATEWAY),
            (CacheError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CacheError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (CacheError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_display_includes_message() {
        let err = CacheError::Provider("REQUEST_DENIED".to_string());
        assert_eq!(err.to_string(), "Provider error: REQUEST_DENIED");
    }
}
