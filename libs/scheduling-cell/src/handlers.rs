use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{Actor, AppointmentFilter, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::services::scheduler::AppointmentScheduler;

pub async fn list_appointments(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Extension(user): Extension<User>,
    Query(filter): Query<AppointmentFilter>,
) -> Result<Json<Value>, AppError> {
    let actor = Actor::from_user(&user);
    let appointments = scheduler.list(&actor, filter).await?;
    let count = appointments.len();
    Ok(Json(json!({
        "appointments": appointments,
        "count": count
    })))
}

pub async fn get_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let actor = Actor::from_user(&user);
    let appointment = scheduler.get(&actor, appointment_id).await?;
    Ok(Json(json!(appointment)))
}

pub async fn create_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let actor = Actor::from_user(&user);
    let appointment = scheduler.create(&actor, request).await?;
    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

pub async fn update_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let actor = Actor::from_user(&user);
    let appointment = scheduler.update(&actor, appointment_id, request).await?;
    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

pub async fn delete_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let actor = Actor::from_user(&user);
    scheduler.delete(&actor, appointment_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted"
    })))
}

#[derive(Debug, Deserialize)]
pub struct SlotOptionsQuery {
    pub date: Option<NaiveDate>,
}

pub async fn get_slot_options(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Extension(user): Extension<User>,
    Query(query): Query<SlotOptionsQuery>,
) -> Result<Json<Value>, AppError> {
    let actor = Actor::from_user(&user);
    let slots = scheduler.slot_options(&actor, query.date);
    Ok(Json(json!({ "slots": slots })))
}
