//! Repository trait definition for appointment storage.
//!
//! The trait abstracts the persistence backend away from the scheduling
//! engine: the engine loads, queries, saves, and deletes appointments
//! through it and never touches storage mechanics directly.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust.

pub mod error;

pub use error::{RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Appointment, AppointmentId, SubjectId};

/// Repository trait for appointment storage operations.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Check if the storage backend is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is reachable and healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Retrieve an appointment by id.
    ///
    /// # Returns
    /// * `Ok(Some(Appointment))` when it exists
    /// * `Ok(None)` when no appointment has that id
    async fn find(&self, id: AppointmentId) -> RepositoryResult<Option<Appointment>>;

    /// All appointments for a subject on a given business-local day,
    /// regardless of status. Excluding-by-id is handled by the caller.
    async fn find_by_subject_and_day(
        &self,
        subject_id: SubjectId,
        day: NaiveDate,
    ) -> RepositoryResult<Vec<Appointment>>;

    /// List every stored appointment.
    async fn list_all(&self) -> RepositoryResult<Vec<Appointment>>;

    /// Upsert an appointment.
    ///
    /// An appointment without an id is inserted and assigned one; an
    /// appointment with an id replaces the stored record. Backends that
    /// enforce `(subject, business day)` uniqueness surface a violation as
    /// [`RepositoryError::ConstraintViolation`].
    ///
    /// # Returns
    /// * `Ok(Appointment)` - the stored record, id populated
    async fn save(&self, appointment: &Appointment) -> RepositoryResult<Appointment>;

    /// Delete an appointment by id.
    ///
    /// # Returns
    /// * `Ok(true)` when a record was removed, `Ok(false)` when none existed
    async fn delete(&self, id: AppointmentId) -> RepositoryResult<bool>;

    /// Whether this backend enforces `(subject, business day)` uniqueness at
    /// save time. When `false`, the engine serializes conflict checking and
    /// saving through its own per-day lock.
    fn enforces_day_uniqueness(&self) -> bool {
        false
    }
}
