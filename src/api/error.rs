//! API error handling.
//!
//! Every failure leaves the endpoint as `{ "error": <message> }`. Storage
//! failures are not distinguished by cause: all of them are a 500 carrying
//! the backend's raw message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::infrastructure::RepositoryError;

// =============================================================================
// Error Body
// =============================================================================

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

// =============================================================================
// API Error Response
// =============================================================================

/// API error response containing status code and message.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Error message sent in the body.
    pub message: String,
}

impl ApiErrorResponse {
    /// Creates a new API error response.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request response.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 500 Internal Server Error response.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<RepositoryError> for ApiErrorResponse {
    fn from(error: RepositoryError) -> Self {
        tracing::error!(%error, "Storage operation failed");
        Self::internal_error(error.message())
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(%rejection, "Rejected request body");
        Self::bad_request(rejection.body_text())
    }
}

// =============================================================================
// Tests
// =============================================================================
