use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentPatch, AppointmentQuery, NewAppointment, SchedulingError,
};

/// Persistence contract for appointments. `query` returns rows ordered by
/// `scheduled_at` ascending.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn create(&self, fields: NewAppointment) -> Result<Appointment, SchedulingError>;
    async fn update(&self, id: Uuid, patch: AppointmentPatch)
        -> Result<Appointment, SchedulingError>;
    async fn delete(&self, id: Uuid) -> Result<(), SchedulingError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, SchedulingError>;
    async fn query(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>, SchedulingError>;

    /// Appointments for `service_id` whose `scheduled_at` falls inside the
    /// half-open window `[slot_start, slot_end)`, regardless of status.
    async fn find_conflicting(
        &self,
        service_id: Uuid,
        slot_start: DateTime<Utc>,
        slot_end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Appointment>, SchedulingError>;
}

pub struct SupabaseAppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

fn db_err(e: anyhow::Error) -> SchedulingError {
    SchedulingError::Database(e.to_string())
}

fn patch_body(patch: AppointmentPatch) -> Value {
    let mut body = Map::new();
    if let Some(v) = patch.owner_name {
        body.insert("owner_name".to_string(), json!(v));
    }
    if let Some(v) = patch.pet_name {
        body.insert("pet_name".to_string(), json!(v));
    }
    if let Some(v) = patch.species {
        body.insert("species".to_string(), json!(v));
    }
    if let Some(v) = patch.scheduled_at {
        body.insert("scheduled_at".to_string(), json!(v.to_rfc3339()));
    }
    if let Some(v) = patch.reason {
        body.insert("reason".to_string(), json!(v));
    }
    if let Some(v) = patch.service_id {
        body.insert("service_id".to_string(), json!(v));
    }
    if let Some(v) = patch.status {
        body.insert("status".to_string(), json!(v));
    }
    body.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
    Value::Object(body)
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn create(&self, fields: NewAppointment) -> Result<Appointment, SchedulingError> {
        let now = Utc::now();
        let body = json!({
            "owner_name": fields.owner_name,
            "pet_name": fields.pet_name,
            "species": fields.species,
            "scheduled_at": fields.scheduled_at.to_rfc3339(),
            "reason": fields.reason,
            "status": fields.status,
            "service_id": fields.service_id,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339(),
        });

        let mut rows: Vec<Appointment> = self
            .supabase
            .request_returning(Method::POST, "/rest/v1/appointments", Some(body))
            .await
            .map_err(db_err)?;

        if rows.is_empty() {
            return Err(SchedulingError::Database(
                "insert returned no representation".to_string(),
            ));
        }
        Ok(rows.remove(0))
    }

    async fn update(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, SchedulingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let mut rows: Vec<Appointment> = self
            .supabase
            .request_returning(Method::PATCH, &path, Some(patch_body(patch)))
            .await
            .map_err(db_err)?;

        if rows.is_empty() {
            return Err(SchedulingError::NotFound);
        }
        Ok(rows.remove(0))
    }

    async fn delete(&self, id: Uuid) -> Result<(), SchedulingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let rows: Vec<Appointment> = self
            .supabase
            .request_returning(Method::DELETE, &path, None)
            .await
            .map_err(db_err)?;

        if rows.is_empty() {
            return Err(SchedulingError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, SchedulingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}&limit=1", id);
        let mut rows: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)?;

        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    async fn query(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>, SchedulingError> {
        let mut parts = Vec::new();
        if let Some(status) = query.status {
            parts.push(format!("status=eq.{}", status));
        }
        if let Some(service_id) = query.service_id {
            parts.push(format!("service_id=eq.{}", service_id));
        }
        if let Some(from) = query.from {
            parts.push(format!(
                "scheduled_at=gte.{}",
                urlencoding::encode(&from.to_rfc3339())
            ));
        }
        if let Some(to) = query.to {
            parts.push(format!(
                "scheduled_at=lte.{}",
                urlencoding::encode(&to.to_rfc3339())
            ));
        }
        parts.push("order=scheduled_at.asc".to_string());

        let path = format!("/rest/v1/appointments?{}", parts.join("&"));
        self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)
    }

    async fn find_conflicting(
        &self,
        service_id: Uuid,
        slot_start: DateTime<Utc>,
        slot_end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let mut parts = vec![
            format!("service_id=eq.{}", service_id),
            format!(
                "scheduled_at=gte.{}",
                urlencoding::encode(&slot_start.to_rfc3339())
            ),
            format!(
                "scheduled_at=lt.{}",
                urlencoding::encode(&slot_end.to_rfc3339())
            ),
        ];
        if let Some(exclude_id) = exclude {
            parts.push(format!("id=neq.{}", exclude_id));
        }

        let path = format!("/rest/v1/appointments?{}", parts.join("&"));
        self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)
    }
}
