//! Error types for the store crate.

use thiserror::Error;

/// Errors reported by credential stores and session slots.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched.
    #[error("record not found")]
    NotFound,

    /// An insert or update collided with a unique column.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A stored row could not be turned into an account.
    #[error("malformed row: {0}")]
    MalformedRow(String),

    /// Backend is misconfigured.
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// A stored value is not valid text.
    #[error("corrupt entry: {0}")]
    Corrupt(String),

    /// Slot storage error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation(
                db.constraint().unwrap_or("username").to_string(),
            ),
            other => StoreError::Database(other.to_string()),
        }
    }
}
