use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::auth::{ActorRole, User};
use shared_models::error::AppError;

/// A booked visit. `scheduled_at` is stored in UTC; request payloads carry
/// clinic-local wall time and are converted at the scheduler boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub owner_name: String,
    pub pet_name: String,
    pub species: String,
    pub scheduled_at: DateTime<Utc>,
    pub reason: String,
    pub status: AppointmentStatus,
    pub service_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Completed and cancelled appointments are closed: immutable and
    /// undeletable.
    pub fn is_closed(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for AppointmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "no_show" | "no-show" | "noshow" => Ok(AppointmentStatus::NoShow),
            _ => Err(()),
        }
    }
}

/// Who is performing an operation and at what instant. Every scheduler
/// operation takes this explicitly instead of reaching for ambient state,
/// which keeps time-dependent rules testable with a fixed clock.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub role: ActorRole,
    pub now: DateTime<Utc>,
}

impl Actor {
    pub fn new(role: ActorRole, now: DateTime<Utc>) -> Self {
        Self { role, now }
    }

    pub fn from_user(user: &User) -> Self {
        Self::new(user.actor_role(), Utc::now())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub owner_name: String,
    pub pet_name: String,
    pub species: Option<String>,
    pub species_other: Option<String>,
    /// Clinic-local wall time, e.g. "2025-06-02T10:30:00".
    pub scheduled_at: NaiveDateTime,
    #[serde(default)]
    pub reason: String,
    pub service_id: Uuid,
    /// Accepted from older clients but ignored; new appointments always
    /// start out pending.
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub owner_name: Option<String>,
    pub pet_name: Option<String>,
    pub species: Option<String>,
    pub species_other: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub reason: Option<String>,
    pub service_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}

/// Listing filters, all optional and combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentFilter {
    pub status: Option<String>,
    pub service_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub q: Option<String>,
}

/// Validated row data handed to the store on insert.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub owner_name: String,
    pub pet_name: String,
    pub species: String,
    pub scheduled_at: DateTime<Utc>,
    pub reason: String,
    pub status: AppointmentStatus,
    pub service_id: Uuid,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub owner_name: Option<String>,
    pub pet_name: Option<String>,
    pub species: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub service_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    pub fn status_only(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Resolved store query; timestamps are already UTC instants.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
    pub status: Option<AppointmentStatus>,
    pub service_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("appointment not found")]
    NotFound,

    #[error("service not found")]
    ServiceNotFound,

    #[error("another appointment already occupies this slot for the service")]
    SlotTaken,

    #[error("appointment is closed and can no longer be modified")]
    Closed,

    #[error("completed or cancelled appointments cannot be deleted")]
    DeleteClosed,

    #[error("{0}")]
    Validation(String),

    #[error("status '{requested}' is not allowed for this appointment")]
    StatusNotAllowed { requested: AppointmentStatus },

    #[error("{0}")]
    PermissionDenied(&'static str),

    #[error("database error: {0}")]
    Database(String),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::NotFound | SchedulingError::ServiceNotFound => {
                AppError::NotFound(err.to_string())
            }
            SchedulingError::SlotTaken | SchedulingError::DeleteClosed => {
                AppError::Conflict(err.to_string())
            }
            SchedulingError::Closed
            | SchedulingError::Validation(_)
            | SchedulingError::StatusNotAllowed { .. } => AppError::BadRequest(err.to_string()),
            SchedulingError::PermissionDenied(_) => AppError::Forbidden(err.to_string()),
            SchedulingError::Database(_) => AppError::Database(err.to_string()),
        }
    }
}
