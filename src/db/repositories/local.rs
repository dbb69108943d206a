//! In-memory local repository implementation.
//!
//! This module provides a local implementation of the repository trait
//! suitable for unit testing and local development. All data is stored in
//! memory, providing fast, deterministic, and isolated execution.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use parking_lot::RwLock;

use crate::db::repository::{AppointmentRepository, RepositoryError, RepositoryResult};
use crate::models::{Appointment, AppointmentId, SubjectId};

/// In-memory local repository.
///
/// Stores appointments in a `HashMap` behind an `RwLock` and assigns ids
/// from a monotonic counter, mirroring how a relational backend assigns
/// primary keys. With [`LocalRepository::with_day_uniqueness`] the store
/// additionally enforces a `(subject, business day)` uniqueness constraint
/// at save time, the way a relational unique index would, so both
/// double-booking protection paths of the engine can be exercised.
#[derive(Clone, Debug)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    enforce_day_uniqueness: bool,
}

#[derive(Debug)]
struct LocalData {
    appointments: HashMap<i64, Appointment>,
    next_id: i64,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            appointments: HashMap::new(),
            next_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository without a uniqueness constraint.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            enforce_day_uniqueness: false,
        }
    }

    /// Create a repository that enforces `(subject, business day)`
    /// uniqueness at save time.
    pub fn with_day_uniqueness() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            enforce_day_uniqueness: true,
        }
    }

    /// Flip the simulated connection health. Test helper.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    fn check_unique(
        data: &LocalData,
        candidate: &Appointment,
    ) -> Result<(), RepositoryError> {
        let clash = data.appointments.values().any(|a| {
            a.subject_id == candidate.subject_id
                && a.business_day == candidate.business_day
                && a.id != candidate.id
        });
        if clash {
            return Err(RepositoryError::ConstraintViolation {
                subject_id: candidate.subject_id,
                day: candidate.business_day,
            });
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppointmentRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn find(&self, id: AppointmentId) -> RepositoryResult<Option<Appointment>> {
        Ok(self.data.read().appointments.get(&id.value()).cloned())
    }

    async fn find_by_subject_and_day(
        &self,
        subject_id: SubjectId,
        day: NaiveDate,
    ) -> RepositoryResult<Vec<Appointment>> {
        let data = self.data.read();
        let mut matches: Vec<Appointment> = data
            .appointments
            .values()
            .filter(|a| a.subject_id == subject_id && a.business_day == day)
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.id.map(|id| id.value()));
        Ok(matches)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Appointment>> {
        let data = self.data.read();
        let mut all: Vec<Appointment> = data.appointments.values().cloned().collect();
        all.sort_by_key(|a| a.id.map(|id| id.value()));
        Ok(all)
    }

    async fn save(&self, appointment: &Appointment) -> RepositoryResult<Appointment> {
        let mut data = self.data.write();

        let mut stored = appointment.clone();
        if self.enforce_day_uniqueness {
            Self::check_unique(&data, &stored)?;
        }

        let id = match stored.id {
            Some(id) => id,
            None => {
                let id = AppointmentId::new(data.next_id);
                data.next_id += 1;
                id
            }
        };
        stored.id = Some(id);
        debug!(
            "saving appointment {} for subject {} on {}",
            id, stored.subject_id, stored.business_day
        );
        data.appointments.insert(id.value(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: AppointmentId) -> RepositoryResult<bool> {
        let removed = self.data.write().appointments.remove(&id.value()).is_some();
        debug!("delete appointment {}: removed={}", id, removed);
        Ok(removed)
    }

    fn enforces_day_uniqueness(&self) -> bool {
        self.enforce_day_uniqueness
    }
}
