//! Translation of service failures into HTTP responses.
//!
//! # Invariants
//! - Every error body is `{"error": <message>}`, except not-found which has
//!   no body.
//! - Store internals only reach the log, never the client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use phonebook_core::PersonServiceError;
use serde::{Deserialize, Serialize};

pub const MALFORMATTED_ID_MESSAGE: &str = "Malformatted id";
pub const UNKNOWN_ENDPOINT_MESSAGE: &str = "Unknown endpoint";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// JSON error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Service(PersonServiceError),
    /// Request body could not be decoded.
    InvalidBody(JsonRejection),
    /// The blocking store task panicked or was cancelled.
    Task(tokio::task::JoinError),
}

impl From<PersonServiceError> for ApiError {
    fn from(value: PersonServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::InvalidBody(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Service(PersonServiceError::Validation(err)) => {
                warn!(
                    "event=http_error module=http status=rejected kind=validation violations={}",
                    err.violations().len()
                );
                error_response(StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Service(PersonServiceError::InvalidId(_)) => {
                warn!("event=http_error module=http status=rejected kind=malformed_id");
                error_response(StatusCode::BAD_REQUEST, MALFORMATTED_ID_MESSAGE)
            }
            Self::Service(PersonServiceError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
            Self::Service(PersonServiceError::Store(err)) => {
                error!("event=http_error module=http status=error kind=store error={err}");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
            Self::InvalidBody(rejection) => {
                warn!(
                    "event=http_error module=http status=rejected kind=invalid_body http_status={}",
                    rejection.status().as_u16()
                );
                error_response(StatusCode::BAD_REQUEST, rejection.body_text())
            }
            Self::Task(err) => {
                error!("event=http_error module=http status=error kind=task error={err}");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}
