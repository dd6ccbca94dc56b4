//! Error types for dashkit-inventory

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Inventory domain errors; none of them leaves the store changed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Please enter a product name")]
    EmptyName,

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown stock status: {0}")]
    UnknownStatus(String),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::UnknownProduct(_) => ApiError::NotFound(err.to_string()),
            InventoryError::EmptyName
            | InventoryError::UnknownCategory(_)
            | InventoryError::UnknownStatus(_) => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        };

        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg,
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
