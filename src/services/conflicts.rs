//! Per-subject double-booking detection.
//!
//! Two appointments for the same subject conflict when their scheduled
//! instants fall on the same business-local calendar day. Day granularity is
//! deliberate: appointments are modeled as full time slots, not interval
//! ranges. The check is status-blind.

use chrono::{DateTime, Utc};

use crate::db::repository::{AppointmentRepository, RepositoryResult};
use crate::models::{AppointmentId, BusinessClock, SubjectId};

/// Booking-conflict check against the repository.
///
/// On its own this is a read followed by a separate save, a check-then-act
/// sequence; the scheduling engine serializes the two per
/// `(subject, business day)` or relies on a store-level constraint. Callers
/// must not treat a `false` result alone as permission to persist.
#[derive(Debug, Clone, Copy)]
pub struct ConflictChecker {
    clock: BusinessClock,
}

impl ConflictChecker {
    pub fn new(clock: BusinessClock) -> Self {
        Self { clock }
    }

    /// Whether `subject_id` already has an appointment on the business-local
    /// day of `candidate`, ignoring the appointment identified by `exclude`
    /// (the record being rescheduled must not conflict with itself).
    pub async fn has_conflict<R: AppointmentRepository>(
        &self,
        repo: &R,
        subject_id: SubjectId,
        candidate: DateTime<Utc>,
        exclude: Option<AppointmentId>,
    ) -> RepositoryResult<bool> {
        let day = self.clock.business_date(candidate);
        let existing = repo.find_by_subject_and_day(subject_id, day).await?;
        Ok(existing
            .iter()
            .any(|a| a.id.is_some() && a.id != exclude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::{Appointment, AppointmentStatus};
    use chrono::TimeZone;

    fn checker() -> ConflictChecker {
        ConflictChecker::new(BusinessClock::new("America/Los_Angeles").unwrap())
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    async fn seed(
        repo: &LocalRepository,
        subject_id: SubjectId,
        scheduled_at: DateTime<Utc>,
    ) -> Appointment {
        let clock = BusinessClock::new("America/Los_Angeles").unwrap();
        let appointment = Appointment {
            id: None,
            subject_id,
            scheduled_at,
            business_day: clock.business_date(scheduled_at),
            status: AppointmentStatus::Scheduled,
            created_at: scheduled_at,
            updated_at: scheduled_at,
        };
        repo.save(&appointment).await.unwrap()
    }

    #[tokio::test]
    async fn test_same_day_same_subject_conflicts() {
        let repo = LocalRepository::new();
        let subject = SubjectId::new(7);
        seed(&repo, subject, utc(2025, 4, 10, 16, 0)).await;

        // 15:00 PDT the same local day.
        let conflict = checker()
            .has_conflict(&repo, subject, utc(2025, 4, 10, 22, 0), None)
            .await
            .unwrap();
        assert!(conflict);
    }

    #[tokio::test]
    async fn test_other_subject_does_not_conflict() {
        let repo = LocalRepository::new();
        seed(&repo, SubjectId::new(7), utc(2025, 4, 10, 16, 0)).await;

        let conflict = checker()
            .has_conflict(&repo, SubjectId::new(8), utc(2025, 4, 10, 22, 0), None)
            .await
            .unwrap();
        assert!(!conflict);
    }

    #[tokio::test]
    async fn test_other_day_does_not_conflict() {
        let repo = LocalRepository::new();
        let subject = SubjectId::new(7);
        seed(&repo, subject, utc(2025, 4, 10, 16, 0)).await;

        let conflict = checker()
            .has_conflict(&repo, subject, utc(2025, 4, 11, 16, 0), None)
            .await
            .unwrap();
        assert!(!conflict);
    }

    #[tokio::test]
    async fn test_excluded_id_is_ignored() {
        let repo = LocalRepository::new();
        let subject = SubjectId::new(7);
        let stored = seed(&repo, subject, utc(2025, 4, 10, 16, 0)).await;

        let conflict = checker()
            .has_conflict(&repo, subject, utc(2025, 4, 10, 22, 0), stored.id)
            .await
            .unwrap();
        assert!(!conflict);
    }

    #[tokio::test]
    async fn test_conflict_uses_business_local_day_not_utc_day() {
        let repo = LocalRepository::new();
        let subject = SubjectId::new(7);
        // 2025-04-10 23:30 UTC = 16:30 PDT on April 10.
        seed(&repo, subject, utc(2025, 4, 10, 23, 30)).await;

        // 2025-04-11 01:30 UTC is a different UTC day but still
        // April 10 in Pacific time (18:30 PDT).
        let conflict = checker()
            .has_conflict(&repo, subject, utc(2025, 4, 11, 1, 30), None)
            .await
            .unwrap();
        assert!(conflict);
    }
}
