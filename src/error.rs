//! Error types for the gateway
//!
//! `ServiceError` is the crate-wide error. Handlers return `Result<T>`
//! (aliasing `Result<T, ServiceError>`) and rely on the `ResponseError`
//! implementation to turn each variant into an HTTP response whose body is
//! `{"detail": "<message>"}`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration could not be loaded or was invalid.
    #[error("{0}")]
    Config(String),

    /// The request was malformed (bad upload, wrong file type, etc.).
    #[error("{0}")]
    BadRequest(String),

    /// The request was well-formed but failed validation.
    #[error("{0}")]
    Validation(String),

    /// A referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with the current state of a resource.
    #[error("{0}")]
    Conflict(String),

    /// An unexpected internal failure.
    #[error("{0}")]
    Internal(String),

    /// A failure originating from the HTTP client.
    #[error("{0}")]
    Client(#[from] reqwest::Error),
}

/// Convenience alias for results carrying a [`ServiceError`].
pub type Result<T> = std::result::Result<T, ServiceError>;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Config(_) | ServiceError::Internal(_) | ServiceError::Client(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
