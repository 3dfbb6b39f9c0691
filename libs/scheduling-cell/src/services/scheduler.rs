use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use catalog_cell::store::ServiceCatalog;
use shared_utils::text::contains_normalized;

use crate::models::{
    Actor, Appointment, AppointmentFilter, AppointmentPatch, AppointmentQuery, AppointmentStatus,
    CreateAppointmentRequest, NewAppointment, SchedulingError, UpdateAppointmentRequest,
};
use crate::services::lifecycle::AppointmentLifecycle;
use crate::services::slots;
use crate::store::AppointmentStore;

/// Books, reschedules and closes out appointments. Wall-clock payloads are
/// interpreted in the clinic time zone; everything is stored in UTC.
pub struct AppointmentScheduler {
    catalog: Arc<dyn ServiceCatalog>,
    store: Arc<dyn AppointmentStore>,
    clinic_tz: Tz,
    // Serializes the conflict check with the write that follows it so two
    // concurrent bookings cannot both see the slot as free.
    booking_lock: Mutex<()>,
}

impl AppointmentScheduler {
    pub fn new(
        catalog: Arc<dyn ServiceCatalog>,
        store: Arc<dyn AppointmentStore>,
        clinic_tz: Tz,
    ) -> Self {
        Self {
            catalog,
            store,
            clinic_tz,
            booking_lock: Mutex::new(()),
        }
    }

    fn local_now(&self, actor: &Actor) -> NaiveDateTime {
        actor.now.with_timezone(&self.clinic_tz).naive_local()
    }

    fn to_local(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        utc.with_timezone(&self.clinic_tz).naive_local()
    }

    fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>, SchedulingError> {
        self.clinic_tz
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                SchedulingError::Validation(
                    "scheduled time does not exist in the clinic time zone".to_string(),
                )
            })
    }

    async fn ensure_service_exists(&self, service_id: Uuid) -> Result<(), SchedulingError> {
        let exists = self
            .catalog
            .exists(service_id)
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;
        if exists {
            Ok(())
        } else {
            Err(SchedulingError::ServiceNotFound)
        }
    }

    /// Rejects the booking when another appointment for the same service
    /// already sits in the same half-hour slot. Status is irrelevant:
    /// cancelled appointments still hold their slot.
    async fn ensure_slot_free(
        &self,
        service_id: Uuid,
        local: NaiveDateTime,
        exclude: Option<Uuid>,
    ) -> Result<(), SchedulingError> {
        let (slot_start, slot_end) = slots::slot_bounds(local);
        let start = self.to_utc(slot_start)?;
        let end = self.to_utc(slot_end)?;

        let conflicting = self
            .store
            .find_conflicting(service_id, start, end, exclude)
            .await?;
        if conflicting.is_empty() {
            Ok(())
        } else {
            warn!(
                "Slot {} already taken for service {}",
                slot_start, service_id
            );
            Err(SchedulingError::SlotTaken)
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        if !actor.role.is_staff() {
            return Err(SchedulingError::PermissionDenied("staff access required"));
        }

        let owner_name = required_text(&request.owner_name, "owner name")?;
        let pet_name = required_text(&request.pet_name, "pet name")?;
        let species = resolve_species(
            request.species.as_deref(),
            request.species_other.as_deref(),
        )?;
        self.ensure_service_exists(request.service_id).await?;

        if request.scheduled_at <= self.local_now(actor) {
            return Err(SchedulingError::Validation(
                "appointments must be scheduled in the future".to_string(),
            ));
        }
        let scheduled_utc = self.to_utc(request.scheduled_at)?;

        let _guard = self.booking_lock.lock().await;
        self.ensure_slot_free(request.service_id, request.scheduled_at, None)
            .await?;

        // Whatever the form submitted, new appointments start out pending.
        let appointment = self
            .store
            .create(NewAppointment {
                owner_name,
                pet_name,
                species,
                scheduled_at: scheduled_utc,
                reason: request.reason.trim().to_string(),
                status: AppointmentStatus::Pending,
                service_id: request.service_id,
            })
            .await?;

        info!(
            "Appointment {} booked for {} at {}",
            appointment.id, appointment.pet_name, appointment.scheduled_at
        );
        Ok(appointment)
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Appointment, SchedulingError> {
        if !actor.role.is_staff() {
            return Err(SchedulingError::PermissionDenied("staff access required"));
        }
        self.store
            .find_by_id(id)
            .await?
            .ok_or(SchedulingError::NotFound)
    }

    /// Admins may rewrite every field of a future appointment. Once the
    /// visit time has passed, admins fall back to the same status-only
    /// update employees always get.
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        if !actor.role.is_staff() {
            return Err(SchedulingError::PermissionDenied("staff access required"));
        }

        let appointment = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(SchedulingError::NotFound)?;
        AppointmentLifecycle::ensure_open(appointment.status)?;

        let is_past = appointment.scheduled_at <= actor.now;

        if actor.role.is_admin() && !is_past {
            return self.admin_full_edit(actor, appointment, request).await;
        }

        // Status-only path. Any field edits in the payload are ignored.
        let requested = request.status.ok_or_else(|| {
            SchedulingError::Validation("a status change is required".to_string())
        })?;
        AppointmentLifecycle::validate_target(requested, is_past)?;

        debug!("Appointment {} status -> {}", id, requested);
        self.store
            .update(id, AppointmentPatch::status_only(requested))
            .await
    }

    async fn admin_full_edit(
        &self,
        actor: &Actor,
        current: Appointment,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        let owner_name = match request.owner_name {
            Some(v) => required_text(&v, "owner name")?,
            None => current.owner_name.clone(),
        };
        let pet_name = match request.pet_name {
            Some(v) => required_text(&v, "pet name")?,
            None => current.pet_name.clone(),
        };
        let reason = match request.reason {
            Some(v) => v.trim().to_string(),
            None => current.reason.clone(),
        };
        let species = if request.species.is_some() || request.species_other.is_some() {
            resolve_species(
                request.species.as_deref(),
                request.species_other.as_deref(),
            )?
        } else {
            current.species.clone()
        };
        let service_id = match request.service_id {
            Some(service_id) => {
                self.ensure_service_exists(service_id).await?;
                service_id
            }
            None => current.service_id,
        };

        // The status gate is decided against the post-edit timestamp: moving
        // an appointment into the past restricts it to completed/no-show in
        // the same request.
        let scheduled_local = match request.scheduled_at {
            Some(local) => local,
            None => self.to_local(current.scheduled_at),
        };
        let scheduled_utc = self.to_utc(scheduled_local)?;
        let is_past_after_edit = scheduled_utc <= actor.now;

        let status = match request.status {
            Some(requested) => {
                AppointmentLifecycle::validate_target(requested, is_past_after_edit)?;
                requested
            }
            None => current.status,
        };

        let _guard = self.booking_lock.lock().await;
        self.ensure_slot_free(service_id, scheduled_local, Some(current.id))
            .await?;

        info!("Appointment {} edited by admin", current.id);
        self.store
            .update(
                current.id,
                AppointmentPatch {
                    owner_name: Some(owner_name),
                    pet_name: Some(pet_name),
                    species: Some(species),
                    scheduled_at: Some(scheduled_utc),
                    reason: Some(reason),
                    service_id: Some(service_id),
                    status: Some(status),
                },
            )
            .await
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), SchedulingError> {
        if !actor.role.is_admin() {
            return Err(SchedulingError::PermissionDenied(
                "administrator access required",
            ));
        }

        let appointment = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(SchedulingError::NotFound)?;
        if appointment.status.is_closed() {
            return Err(SchedulingError::DeleteClosed);
        }

        self.store.delete(id).await?;
        info!("Appointment {} deleted", id);
        Ok(())
    }

    /// Filtered listing, ordered by `scheduled_at` ascending. Date bounds
    /// are clinic-local calendar days; the text filter matches owner, pet
    /// and reason with accents and case folded away.
    pub async fn list(
        &self,
        actor: &Actor,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        if !actor.role.is_staff() {
            return Err(SchedulingError::PermissionDenied("staff access required"));
        }

        let status = match filter.status.as_deref() {
            Some(raw) => Some(raw.parse::<AppointmentStatus>().map_err(|_| {
                SchedulingError::Validation(format!("unknown status '{}'", raw))
            })?),
            None => None,
        };

        let from = match filter.from_date {
            Some(date) => Some(self.to_utc(day_start(date))?),
            None => None,
        };
        let to = match filter.to_date {
            Some(date) => Some(self.to_utc(day_end(date))?),
            None => None,
        };

        let query = AppointmentQuery {
            status,
            service_id: filter.service_id,
            from,
            to,
        };
        let mut appointments = self.store.query(&query).await?;

        if let Some(needle) = filter.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            appointments.retain(|a| {
                contains_normalized(&a.owner_name, needle)
                    || contains_normalized(&a.pet_name, needle)
                    || contains_normalized(&a.reason, needle)
            });
        }

        Ok(appointments)
    }

    /// Bookable "%H:%M" labels for a clinic-local date. For today the grid
    /// starts at the next upcoming slot boundary; past dates yield nothing.
    pub fn slot_options(&self, actor: &Actor, date: Option<NaiveDate>) -> Vec<String> {
        let local_now = self.local_now(actor);
        let today = local_now.date();
        let date = date.unwrap_or(today);
        let (open, close) = slots::clinic_hours();

        if date < today {
            return Vec::new();
        }

        let start = if date == today {
            let next = slots::ceil_to_half_hour(local_now);
            if next.date() > today {
                return Vec::new();
            }
            open.max(next.time())
        } else {
            open
        };

        if start > close {
            return Vec::new();
        }
        slots::build_half_hour_slots(start, close)
    }
}

fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap_or_default()
}

fn required_text(value: &str, field: &str) -> Result<String, SchedulingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SchedulingError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Species comes from a fixed selector with an "other" escape hatch that
/// requires free text.
fn resolve_species(
    selection: Option<&str>,
    other: Option<&str>,
) -> Result<String, SchedulingError> {
    let selection = selection.map(str::trim).filter(|s| !s.is_empty());
    match selection {
        None => Err(SchedulingError::Validation(
            "select a species".to_string(),
        )),
        Some(s) if s.eq_ignore_ascii_case("other") => {
            let detail = other.map(str::trim).filter(|s| !s.is_empty());
            match detail {
                Some(detail) => Ok(detail.to_string()),
                None => Err(SchedulingError::Validation(
                    "describe the species when selecting 'other'".to_string(),
                )),
            }
        }
        Some(s) => Ok(s.to_string()),
    }
}
