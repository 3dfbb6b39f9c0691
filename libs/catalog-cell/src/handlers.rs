use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::ServiceFields;
use crate::service::CatalogService;

pub async fn list_services(
    State(catalog): State<Arc<CatalogService>>,
) -> Result<Json<Value>, AppError> {
    let services = catalog.list().await?;
    Ok(Json(json!({
        "services": services,
        "count": services.len()
    })))
}

pub async fn get_service(
    State(catalog): State<Arc<CatalogService>>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = catalog.get(service_id).await?;
    Ok(Json(json!(service)))
}

pub async fn create_service(
    State(catalog): State<Arc<CatalogService>>,
    Extension(user): Extension<User>,
    Json(fields): Json<ServiceFields>,
) -> Result<Json<Value>, AppError> {
    let service = catalog.create(user.actor_role(), fields).await?;
    Ok(Json(json!({
        "success": true,
        "service": service
    })))
}

pub async fn update_service(
    State(catalog): State<Arc<CatalogService>>,
    Path(service_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(fields): Json<ServiceFields>,
) -> Result<Json<Value>, AppError> {
    let service = catalog.update(user.actor_role(), service_id, fields).await?;
    Ok(Json(json!({
        "success": true,
        "service": service
    })))
}

pub async fn delete_service(
    State(catalog): State<Arc<CatalogService>>,
    Path(service_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    catalog.delete(user.actor_role(), service_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Service deleted"
    })))
}
