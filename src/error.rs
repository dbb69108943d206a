//! Typed error taxonomy for engine operations.
//!
//! All validation and lifecycle failures are returned as [`EngineError`]
//! values, never as generic errors carrying provider text. Everything except
//! [`EngineError::Configuration`] is per-request and recoverable by the
//! caller retrying with corrected input (or, for [`EngineError::Busy`],
//! after backoff). A configuration failure indicates a bad deployment and
//! should abort startup rather than be handled per-request.

use chrono::NaiveDate;

use crate::db::repository::RepositoryError;
use crate::models::{AppointmentId, AppointmentStatus, SubjectId};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The requested instant is earlier than the current time.
    #[error("appointment must be in the future")]
    PastDate,

    /// The requested instant falls outside the business-hours window.
    /// Carries the business-local 12-hour rendering for the message.
    #[error("requested time {local_time} is outside business hours (9 AM - 7 PM)")]
    OutsideBusinessHours { local_time: String },

    /// The appointment is in a terminal status and can no longer change.
    #[error("cannot modify a {status} appointment")]
    TerminalState { status: AppointmentStatus },

    /// No appointment exists with the given id.
    #[error("appointment {0} not found")]
    NotFound(AppointmentId),

    /// The subject already has an appointment on the requested business day.
    #[error("subject {subject_id} already has an appointment on {day}")]
    Conflict { subject_id: SubjectId, day: NaiveDate },

    /// The per-day scheduling lock could not be acquired within the bounded
    /// wait. Retryable after backoff.
    #[error("scheduling slot is busy, retry later")]
    Busy,

    /// Invalid engine configuration (unresolvable business timezone).
    /// Fatal: abort startup, never retried per-request.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Infrastructure failure surfaced by the repository collaborator.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl EngineError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Busy)
    }
}
