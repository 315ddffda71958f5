//! Error types for the key-value service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

// == KV Error Enum ==
/// Unified error type for the key-value service.
#[derive(Error, Debug)]
pub enum KvError {
    /// Invalid configuration (e.g. a cache capacity of zero)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Create against a key that already exists in the store
    #[error("Key already exists: {0}")]
    Conflict(i64),

    /// Key is absent from the store
    #[error("Key not found: {0}")]
    NotFound(i64),

    /// Backing store failure unrelated to key existence
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl KvError {
    /// Returns true when the error is a PostgreSQL unique violation.
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db_err) => db_err
                .code()
                .map(|code| code == PG_UNIQUE_VIOLATION)
                .unwrap_or(false),
            _ => false,
        }
    }
}

// == Conversions ==
impl From<sqlx::Error> for KvError {
    fn from(err: sqlx::Error) -> Self {
        KvError::Store(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for KvError {
    fn into_response(self) -> Response {
        let status = match &self {
            KvError::NotFound(_) => StatusCode::NOT_FOUND,
            KvError::Conflict(_) => StatusCode::CONFLICT,
            KvError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            KvError::Configuration(_) | KvError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the key-value service.
pub type Result<T> = std::result::Result<T, KvError>;
