//! Service error types with HTTP status code mapping.
//!
//! [`ServiceError`] is the central error type of the service layer. Each
//! variant maps to an HTTP status code and a flat JSON error envelope.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{CarId, ValidationError};

/// JSON error envelope returned by every failing endpoint.
///
/// ```json
/// {
///   "success": false,
///   "message": "car not found: id 7",
///   "error": "not_found"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable description of the failure.
    pub message: String,
    /// Short machine-readable error kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// Builds an envelope with the given message and kind.
    #[must_use]
    pub fn new(message: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: kind.map(str::to_string),
        }
    }
}

/// The key a car was looked up by, for not-found reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarLookup {
    /// Lookup by primary key.
    Id(CarId),
    /// Lookup by live name.
    Name(String),
}

impl fmt::Display for CarLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Name(name) => write!(f, "name {name}"),
        }
    }
}

/// Service-level error enum with HTTP status code mapping.
///
/// | Variant          | HTTP Status               |
/// |------------------|---------------------------|
/// | `InvalidRequest` | 400 Bad Request           |
/// | `CarNotFound`    | 404 Not Found             |
/// | `DuplicateName`  | 409 Conflict              |
/// | `Storage`        | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or rule-violating client input.
    #[error("{0}")]
    InvalidRequest(String),

    /// No live car matched the lookup.
    #[error("car not found: {0}")]
    CarNotFound(CarLookup),

    /// Another live car already uses this name.
    #[error("car with name {0} already exists")]
    DuplicateName(String),

    /// The storage engine failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    /// Returns the machine-readable kind placed in the `error` field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::CarNotFound(_) => "not_found",
            Self::DuplicateName(_) => "conflict",
            Self::Storage(_) => "storage_error",
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::CarNotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateName(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for failures caused by the server rather than the
    /// client.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Storage details stay in the logs.
        let message = if self.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorResponse::new(message, Some(self.kind()));
        (status, axum::Json(body)).into_response()
    }
}
