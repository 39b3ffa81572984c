//! Server error types with HTTP status code mapping.

use axum::Json;
use axum::extract::rejection::{BytesRejection, JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use dogwalk_core::{ErrorBody, ValidationError};

use crate::store::StoreError;

/// Every failure a handler can return. Rendered as `{error:{code,message}}`.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Field-level validation failure (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Malformed request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid or expired bearer token (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Resource id absent from the store (404)
    #[error("{0}")]
    NotFound(String),

    /// Request body over the configured limit (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Anything else (500)
    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::not_found("Dog not found"),
            StoreError::Backend(msg) => Self::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for ServerError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge("Photo exceeds the maximum upload size".into())
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = ErrorBody::new(status.as_u16(), self.to_string());
        (status, Json(body)).into_response()
    }
}
