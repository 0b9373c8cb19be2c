//! HTTP error mapping
//!
//! Validation errors become 400, empty lookups 404, and everything else a
//! generic 500 whose detail only reaches the server log.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Message returned for every 500
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Message returned when a required field is absent
pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required.";

/// API error returned by handlers
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn missing_fields() -> Self {
        ApiError::BadRequest(MISSING_FIELDS_MESSAGE.to_string())
    }
}

impl From<lineup_common::Error> for ApiError {
    fn from(err: lineup_common::Error) -> Self {
        use lineup_common::Error;

        if err.is_foreign_key_violation() {
            return ApiError::BadRequest("Unknown category, show, or breed.".to_string());
        }

        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => {
                error!("Request failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            // Detail was logged when the error was created
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_MESSAGE.to_string(),
            ),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
