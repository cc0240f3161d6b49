//! Failures reported by the credential and reading-list stores.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already registered")]
    DuplicateUsername,

    /// Same variant for an unknown username and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("book title must not be empty")]
    EmptyTitle,

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    #[error("password hash error: {0}")]
    PasswordHash(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::DuplicateUsername => StatusCode::CONFLICT,
            StoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            StoreError::EmptyTitle => StatusCode::BAD_REQUEST,
            StoreError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::StorageUnavailable(e)
    }
}

impl From<StoreError> for (StatusCode, String) {
    fn from(e: StoreError) -> Self {
        let body = match &e {
            StoreError::DuplicateUsername => "Username already registered".to_string(),
            StoreError::InvalidCredentials => "Invalid credentials".to_string(),
            StoreError::EmptyTitle => "Book title must not be empty".to_string(),
            StoreError::StorageUnavailable(_) => "Storage unavailable".to_string(),
            StoreError::PasswordHash(_) => "Internal error".to_string(),
        };
        (e.status(), body)
    }
}
