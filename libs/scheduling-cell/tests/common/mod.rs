#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use catalog_cell::models::{CatalogError, Service};
use catalog_cell::store::ServiceCatalog;
use shared_models::auth::ActorRole;

use scheduling_cell::models::{
    Actor, Appointment, AppointmentPatch, AppointmentQuery, AppointmentStatus,
    CreateAppointmentRequest, NewAppointment, SchedulingError,
};
use scheduling_cell::services::scheduler::AppointmentScheduler;
use scheduling_cell::store::AppointmentStore;

/// Lookup-only catalog double; the scheduler never mutates services.
#[derive(Default)]
pub struct InMemoryCatalog {
    services: RwLock<Vec<Service>>,
}

impl InMemoryCatalog {
    pub async fn add_service(&self, name: &str) -> Uuid {
        let service = Service {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price: 200.0,
            description: format!("{} description", name),
        };
        let id = service.id;
        self.services.write().await.push(service);
        id
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryCatalog {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, CatalogError> {
        Ok(self.services.read().await.iter().find(|s| s.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAppointmentStore {
    rows: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentStore {
    /// Inserts a row directly, bypassing scheduler validation. Lets tests
    /// set up past or closed appointments.
    pub async fn seed(
        &self,
        service_id: Uuid,
        scheduled_at: DateTime<Utc>,
        status: AppointmentStatus,
    ) -> Appointment {
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            owner_name: "Ana Muñoz".to_string(),
            pet_name: "Firulais".to_string(),
            species: "perro".to_string(),
            scheduled_at,
            reason: "Vacunación anual".to_string(),
            status,
            service_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(appointment.clone());
        appointment
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn create(&self, fields: NewAppointment) -> Result<Appointment, SchedulingError> {
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            owner_name: fields.owner_name,
            pet_name: fields.pet_name,
            species: fields.species,
            scheduled_at: fields.scheduled_at,
            reason: fields.reason,
            status: fields.status,
            service_id: fields.service_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(appointment.clone());
        Ok(appointment)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, SchedulingError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(SchedulingError::NotFound)?;

        if let Some(v) = patch.owner_name {
            row.owner_name = v;
        }
        if let Some(v) = patch.pet_name {
            row.pet_name = v;
        }
        if let Some(v) = patch.species {
            row.species = v;
        }
        if let Some(v) = patch.scheduled_at {
            row.scheduled_at = v;
        }
        if let Some(v) = patch.reason {
            row.reason = v;
        }
        if let Some(v) = patch.service_id {
            row.service_id = v;
        }
        if let Some(v) = patch.status {
            row.status = v;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), SchedulingError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|a| a.id != id);
        if rows.len() == before {
            return Err(SchedulingError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, SchedulingError> {
        Ok(self.rows.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn query(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>, SchedulingError> {
        let mut rows: Vec<Appointment> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|a| query.status.map_or(true, |s| a.status == s))
            .filter(|a| query.service_id.map_or(true, |id| a.service_id == id))
            .filter(|a| query.from.map_or(true, |from| a.scheduled_at >= from))
            .filter(|a| query.to.map_or(true, |to| a.scheduled_at <= to))
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.scheduled_at);
        Ok(rows)
    }

    async fn find_conflicting(
        &self,
        service_id: Uuid,
        slot_start: DateTime<Utc>,
        slot_end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|a| a.service_id == service_id)
            .filter(|a| a.scheduled_at >= slot_start && a.scheduled_at < slot_end)
            .filter(|a| exclude != Some(a.id))
            .cloned()
            .collect())
    }
}

pub struct TestEnv {
    pub scheduler: AppointmentScheduler,
    pub store: Arc<InMemoryAppointmentStore>,
    pub catalog: Arc<InMemoryCatalog>,
    pub service_id: Uuid,
}

/// Scheduler wired to in-memory doubles, clinic clock pinned to UTC so test
/// wall times and stored instants coincide.
pub async fn test_env() -> TestEnv {
    let catalog = Arc::new(InMemoryCatalog::default());
    let store = Arc::new(InMemoryAppointmentStore::default());
    let service_id = catalog.add_service("Consulta general").await;

    let scheduler = AppointmentScheduler::new(catalog.clone(), store.clone(), chrono_tz::UTC);
    TestEnv {
        scheduler,
        store,
        catalog,
        service_id,
    }
}

/// Monday 2025-06-02, noon UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
}

pub fn admin() -> Actor {
    Actor::new(ActorRole::Admin, fixed_now())
}

pub fn employee() -> Actor {
    Actor::new(ActorRole::Employee, fixed_now())
}

pub fn anonymous() -> Actor {
    Actor::new(ActorRole::Anonymous, fixed_now())
}

pub fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

pub fn booking(service_id: Uuid, scheduled_at: NaiveDateTime) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        owner_name: "Ana Muñoz".to_string(),
        pet_name: "Firulais".to_string(),
        species: Some("perro".to_string()),
        species_other: None,
        scheduled_at,
        reason: "Vacunación anual".to_string(),
        service_id,
        status: None,
    }
}
