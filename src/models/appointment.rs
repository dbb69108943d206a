//! Appointment records and status lifecycle states.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Appointment identifier. Assigned by the repository on first save.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub i64);

/// Identifier of the subject (user) owning an appointment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub i64);

impl AppointmentId {
    pub fn new(value: i64) -> Self {
        AppointmentId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl SubjectId {
    pub fn new(value: i64) -> Self {
        SubjectId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Appointment lifecycle status.
///
/// A closed enumeration with exactly four members. `Completed` and
/// `Cancelled` are terminal: no further lifecycle transition is permitted
/// from either.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Rescheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether this status permits no further lifecycle transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Rescheduled => "Rescheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed appointment owned by exactly one subject.
///
/// `scheduled_at` is absolute UTC. `business_day` is the business-local
/// calendar day of `scheduled_at`, maintained by the engine whenever the
/// instant is set or changed; it is the key the per-subject conflict policy
/// and any store-level `(subject_id, business_day)` uniqueness constraint
/// operate on, which keeps repositories timezone-ignorant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// None until the repository assigns an id on first save.
    pub id: Option<AppointmentId>,
    pub subject_id: SubjectId,
    pub scheduled_at: DateTime<Utc>,
    pub business_day: NaiveDate,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
