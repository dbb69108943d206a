//! Error types for repository operations.

use chrono::NaiveDate;

use crate::models::SubjectId;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    /// A store-level `(subject, business day)` uniqueness constraint
    /// rejected the save. The engine maps this to a booking conflict.
    #[error("Uniqueness violation: subject {subject_id} already booked on {day}")]
    ConstraintViolation { subject_id: SubjectId, day: NaiveDate },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<String> for RepositoryError {
    fn from(s: String) -> Self {
        RepositoryError::InternalError(s)
    }
}

impl From<&str> for RepositoryError {
    fn from(s: &str) -> Self {
        RepositoryError::InternalError(s.to_string())
    }
}
