//! Error types and HTTP response conversion

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::{RepositoryError, RepositoryErrorKind};
use crate::validation::EntityValidationError;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Structured repository error (not found, conflict, store failures)
    #[error("{0}")]
    Repository(RepositoryError),

    /// Entity props failed validation (422)
    #[error("{0}")]
    Validation(EntityValidationError),

    /// Missing or malformed input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unknown email or wrong password at sign-in (401)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password change rejected (422)
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Password hashing failure
    #[error("Auth error: {0}")]
    Auth(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this wraps a repository `NotFound`
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Repository(e) if e.is_not_found())
    }

    /// Whether this wraps a repository `Conflict`
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Repository(e) if e.is_conflict())
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,

    /// Per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: status.as_u16(),
            fields: None,
        }
    }

    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
            fields: None,
        }
    }
}

fn repository_status(kind: RepositoryErrorKind) -> StatusCode {
    match kind {
        RepositoryErrorKind::NotFound => StatusCode::NOT_FOUND,
        RepositoryErrorKind::Conflict => StatusCode::CONFLICT,
        RepositoryErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
        RepositoryErrorKind::ConnectionFailed => StatusCode::SERVICE_UNAVAILABLE,
        RepositoryErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIG_ERROR",
                        "Service misconfigured",
                    ),
                )
            }

            Error::Repository(ref e) => {
                let status = repository_status(e.kind);
                if status.is_server_error() {
                    tracing::error!(
                        operation = %e.operation,
                        kind = %e.kind,
                        entity_type = ?e.entity_type,
                        retriable = e.is_retriable(),
                        "Repository error: {}", e.message
                    );
                }

                let code = format!("REPOSITORY_{}", e.kind.to_string().to_uppercase());

                // Store internals stay out of the response body
                let message = match e.kind {
                    RepositoryErrorKind::NotFound
                    | RepositoryErrorKind::Conflict
                    | RepositoryErrorKind::ValidationFailed => e.to_string(),
                    RepositoryErrorKind::Timeout => "Repository operation timed out".to_string(),
                    _ => "Repository operation failed".to_string(),
                };

                (status, ErrorResponse::with_code(status, code, message))
            }

            Error::Validation(e) => {
                let mut response = ErrorResponse::with_code(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    "Entity validation failed",
                );
                response.fields = Some(e.fields().clone());
                (StatusCode::UNPROCESSABLE_ENTITY, response)
            }

            Error::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_code(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ),

            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::with_code(
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid credentials",
                ),
            ),

            Error::InvalidPassword(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::with_code(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_PASSWORD", msg),
            ),

            Error::Auth(msg) => {
                tracing::error!("Auth error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "AUTH_ERROR",
                        "Authentication processing failed",
                    ),
                )
            }

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        Error::Repository(err)
    }
}

impl From<EntityValidationError> for Error {
    fn from(err: EntityValidationError) -> Self {
        Error::Validation(err)
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Repository(RepositoryError::from(err))
    }
}
