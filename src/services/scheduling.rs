//! Scheduling engine: orchestrates validation, lifecycle rules, conflict
//! detection, and persistence for every appointment operation.
//!
//! Evaluating the conflict check and then saving is a check-then-act
//! sequence; run concurrently for the same subject and day it would let two
//! creates both pass the check before either persists. The engine closes the
//! race one of two ways, depending on what the repository guarantees:
//!
//! - repository enforces `(subject, business day)` uniqueness: the engine
//!   saves and maps the store's constraint violation to a conflict;
//! - otherwise: the engine serializes check-and-save through an async lock
//!   keyed by `(subject, business day)`, with a bounded wait that surfaces
//!   as a retryable busy error.
//!
//! The engine holds no other cross-request state; appointments are loaded
//! fresh per operation and never cached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::OwnedMutexGuard;

use crate::config::EngineConfig;
use crate::db::repository::{AppointmentRepository, RepositoryError};
use crate::error::{EngineError, EngineResult};
use crate::models::{Appointment, AppointmentId, AppointmentStatus, BusinessClock, SubjectId};
use crate::services::business_hours::BusinessHoursValidator;
use crate::services::conflicts::ConflictChecker;
use crate::services::transitions::{next_status, LifecycleAction};

/// Registry of per-`(subject, business day)` async locks.
///
/// Slots are created on demand and removed once nobody holds or awaits them.
/// Cloning a slot requires the registry mutex, so a slot observed with a
/// strong count of 1 (the registry's own reference) cannot gain a waiter
/// while the registry is locked and is safe to drop.
#[derive(Default, Debug)]
struct DayLocks {
    slots: parking_lot::Mutex<HashMap<(SubjectId, NaiveDate), Arc<tokio::sync::Mutex<()>>>>,
}

impl DayLocks {
    /// Acquire the lock for `key`, waiting at most `wait`.
    async fn acquire(
        &self,
        key: (SubjectId, NaiveDate),
        wait: Duration,
    ) -> EngineResult<OwnedMutexGuard<()>> {
        let slot = {
            let mut slots = self.slots.lock();
            slots
                .entry(key)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };

        match tokio::time::timeout(wait, slot.lock_owned()).await {
            Ok(guard) => Ok(guard),
            Err(_) => {
                self.cleanup(key);
                Err(EngineError::Busy)
            }
        }
    }

    /// Drop the slot for `key` if no task holds or awaits it.
    fn cleanup(&self, key: (SubjectId, NaiveDate)) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get(&key) {
            if Arc::strong_count(slot) == 1 {
                slots.remove(&key);
            }
        }
    }
}

/// Orchestrator for appointment lifecycle operations.
///
/// Generic over the repository collaborator; see the crate docs for the
/// validation order each mutating operation follows.
#[derive(Debug)]
pub struct SchedulingEngine<R> {
    repo: R,
    clock: BusinessClock,
    validator: BusinessHoursValidator,
    conflicts: ConflictChecker,
    day_locks: DayLocks,
    lock_wait: Duration,
}

impl<R: AppointmentRepository> SchedulingEngine<R> {
    /// Build an engine from configuration.
    ///
    /// Resolves the business timezone once; an unresolvable name is an
    /// [`EngineError::Configuration`] and should abort startup.
    pub fn new(repo: R, config: &EngineConfig) -> EngineResult<Self> {
        let clock = BusinessClock::new(&config.business_timezone)?;
        Ok(Self {
            repo,
            clock,
            validator: BusinessHoursValidator::new(clock),
            conflicts: ConflictChecker::new(clock),
            day_locks: DayLocks::default(),
            lock_wait: config.lock_wait(),
        })
    }

    /// The engine's business clock.
    pub fn clock(&self) -> &BusinessClock {
        &self.clock
    }

    /// Book a new appointment for `subject_id` at `scheduled_at`.
    ///
    /// Validates business hours, then persists with status `Scheduled` under
    /// the per-day conflict gate. The repository assigns the id.
    pub async fn create(
        &self,
        subject_id: SubjectId,
        scheduled_at: DateTime<Utc>,
    ) -> EngineResult<Appointment> {
        let now = Utc::now();
        self.validator.validate(scheduled_at, now)?;

        let appointment = Appointment {
            id: None,
            subject_id,
            scheduled_at,
            business_day: self.clock.business_date(scheduled_at),
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        self.persist_gated(appointment, None).await
    }

    /// Move an existing appointment to `new_instant`.
    ///
    /// The appointment must exist and be non-terminal; the new instant must
    /// pass business-hours validation; the appointment's own id is excluded
    /// from conflict detection.
    pub async fn reschedule(
        &self,
        id: AppointmentId,
        new_instant: DateTime<Utc>,
    ) -> EngineResult<Appointment> {
        let now = Utc::now();
        let mut appointment = self.load(id).await?;

        appointment.status = next_status(appointment.status, LifecycleAction::Reschedule)?;
        self.validator.validate(new_instant, now)?;

        appointment.scheduled_at = new_instant;
        appointment.business_day = self.clock.business_date(new_instant);
        appointment.updated_at = now;
        self.persist_gated(appointment, Some(id)).await
    }

    /// Mark an appointment completed. Fails on terminal statuses.
    pub async fn complete(&self, id: AppointmentId) -> EngineResult<Appointment> {
        self.transition(id, LifecycleAction::Complete).await
    }

    /// Cancel an appointment. Fails on terminal statuses.
    pub async fn cancel(&self, id: AppointmentId) -> EngineResult<Appointment> {
        self.transition(id, LifecycleAction::Cancel).await
    }

    /// Delete an appointment. Administrative: gated only on existence, not
    /// on the state machine.
    pub async fn delete(&self, id: AppointmentId) -> EngineResult<bool> {
        Ok(self.repo.delete(id).await?)
    }

    /// Fetch an appointment by id.
    pub async fn get(&self, id: AppointmentId) -> EngineResult<Appointment> {
        self.load(id).await
    }

    /// All appointments for a subject on a business-local day.
    pub async fn list_by_subject_and_day(
        &self,
        subject_id: SubjectId,
        day: NaiveDate,
    ) -> EngineResult<Vec<Appointment>> {
        Ok(self.repo.find_by_subject_and_day(subject_id, day).await?)
    }

    /// Every stored appointment.
    pub async fn list_all(&self) -> EngineResult<Vec<Appointment>> {
        Ok(self.repo.list_all().await?)
    }

    async fn load(&self, id: AppointmentId) -> EngineResult<Appointment> {
        self.repo
            .find(id)
            .await?
            .ok_or(EngineError::NotFound(id))
    }

    async fn transition(
        &self,
        id: AppointmentId,
        action: LifecycleAction,
    ) -> EngineResult<Appointment> {
        let mut appointment = self.load(id).await?;
        appointment.status = next_status(appointment.status, action)?;
        appointment.updated_at = Utc::now();
        save_mapped(&self.repo, &appointment).await
    }

    /// Run the conflict check and the save with per-day exclusivity.
    ///
    /// When the repository enforces uniqueness itself the store is the
    /// authority: the pre-check only produces the typed conflict on the
    /// common path, and a constraint violation at save time is mapped to the
    /// same error. Otherwise the check and the save run under the day lock.
    async fn persist_gated(
        &self,
        appointment: Appointment,
        exclude: Option<AppointmentId>,
    ) -> EngineResult<Appointment> {
        let subject_id = appointment.subject_id;
        let day = appointment.business_day;

        if self.repo.enforces_day_uniqueness() {
            if self
                .conflicts
                .has_conflict(&self.repo, subject_id, appointment.scheduled_at, exclude)
                .await?
            {
                return Err(EngineError::Conflict { subject_id, day });
            }
            return save_mapped(&self.repo, &appointment).await;
        }

        let key = (subject_id, day);
        let guard = self.day_locks.acquire(key, self.lock_wait).await?;
        let result = match self
            .conflicts
            .has_conflict(&self.repo, subject_id, appointment.scheduled_at, exclude)
            .await
        {
            Ok(true) => Err(EngineError::Conflict { subject_id, day }),
            Ok(false) => save_mapped(&self.repo, &appointment).await,
            Err(e) => Err(EngineError::Repository(e)),
        };
        drop(guard);
        self.day_locks.cleanup(key);
        result
    }
}

/// Save, translating a store-level uniqueness violation into the engine's
/// conflict error.
async fn save_mapped<R: AppointmentRepository>(
    repo: &R,
    appointment: &Appointment,
) -> EngineResult<Appointment> {
    repo.save(appointment).await.map_err(|e| match e {
        RepositoryError::ConstraintViolation { subject_id, day } => {
            EngineError::Conflict { subject_id, day }
        }
        other => EngineError::Repository(other),
    })
}
