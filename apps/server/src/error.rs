//! API error type mapping core errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use foliotrack_core::errors::{DatabaseError, Error as CoreError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned from API handlers; carries the status and a message for
/// the JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed: {}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
            CoreError::Database(DatabaseError::UniqueViolation(_)) => StatusCode::CONFLICT,
            CoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::Import(_) => StatusCode::BAD_REQUEST,
            CoreError::MarketData(_) => StatusCode::BAD_GATEWAY,
            CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}
