use crate::models::{AppointmentStatus, SchedulingError};

/// Status transition rules. Which targets are reachable depends only on
/// whether the visit time has already passed, never on the current status
/// (closed appointments are rejected before this table is consulted).
pub struct AppointmentLifecycle;

const PAST_TARGETS: [AppointmentStatus; 2] =
    [AppointmentStatus::Completed, AppointmentStatus::NoShow];

const FUTURE_TARGETS: [AppointmentStatus; 2] =
    [AppointmentStatus::Pending, AppointmentStatus::Cancelled];

impl AppointmentLifecycle {
    pub fn allowed_targets(is_past: bool) -> &'static [AppointmentStatus] {
        if is_past {
            &PAST_TARGETS
        } else {
            &FUTURE_TARGETS
        }
    }

    pub fn validate_target(
        requested: AppointmentStatus,
        is_past: bool,
    ) -> Result<(), SchedulingError> {
        if Self::allowed_targets(is_past).contains(&requested) {
            Ok(())
        } else {
            Err(SchedulingError::StatusNotAllowed { requested })
        }
    }

    pub fn ensure_open(status: AppointmentStatus) -> Result<(), SchedulingError> {
        if status.is_closed() {
            Err(SchedulingError::Closed)
        } else {
            Ok(())
        }
    }
}
