use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

/// A billable clinic service (consultation, vaccination, grooming, ...).
/// Appointments reference services but never own them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: String,
}

/// Payload for both create and edit; the admin form always submits the
/// full set of fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceFields {
    pub name: String,
    pub price: f64,
    pub description: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("service not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("a service with the same {0} already exists")]
    Duplicate(&'static str),

    #[error("service has appointments scheduled against it")]
    Referenced,

    #[error("administrator access required")]
    AdminRequired,

    #[error("database error: {0}")]
    Database(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => AppError::NotFound(err.to_string()),
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::Duplicate(_) => AppError::Conflict(err.to_string()),
            CatalogError::Referenced => AppError::Conflict(err.to_string()),
            CatalogError::AdminRequired => AppError::Forbidden(err.to_string()),
            CatalogError::Database(msg) => AppError::Database(msg),
        }
    }
}
