//! Appointment status state machine.
//!
//! States: `Scheduled` (initial), `Rescheduled`, `Completed`, `Cancelled`.
//! Legal transitions:
//!
//! | From                    | Action     | To          |
//! |-------------------------|------------|-------------|
//! | Scheduled / Rescheduled | reschedule | Rescheduled |
//! | Scheduled / Rescheduled | complete   | Completed   |
//! | Scheduled / Rescheduled | cancel     | Cancelled   |
//!
//! `Completed` and `Cancelled` are terminal and mutually exclusive: every
//! action attempted from either fails, including a repeated complete or
//! cancel. Idempotency violations fail loudly rather than silently succeed.

use crate::error::{EngineError, EngineResult};
use crate::models::AppointmentStatus;

/// Lifecycle operations that move an appointment between statuses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    Reschedule,
    Complete,
    Cancel,
}

/// Decide the status an appointment moves to under `action`.
///
/// # Returns
/// * `Ok(AppointmentStatus)` - the target status
/// * `Err(EngineError::TerminalState)` - the current status is terminal,
///   named in the error
pub fn next_status(
    current: AppointmentStatus,
    action: LifecycleAction,
) -> EngineResult<AppointmentStatus> {
    if current.is_terminal() {
        return Err(EngineError::TerminalState { status: current });
    }

    Ok(match action {
        LifecycleAction::Reschedule => AppointmentStatus::Rescheduled,
        LifecycleAction::Complete => AppointmentStatus::Completed,
        LifecycleAction::Cancel => AppointmentStatus::Cancelled,
    })
}
