use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{CatalogError, Service, ServiceFields};

/// The lookup contract other cells (the appointment scheduler) consume.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, CatalogError>;

    async fn exists(&self, id: Uuid) -> Result<bool, CatalogError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

/// Full persistence contract used by the catalog cell itself.
#[async_trait]
pub trait ServiceStore: ServiceCatalog {
    async fn list(&self) -> Result<Vec<Service>, CatalogError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Service>, CatalogError>;
    async fn find_by_description(&self, description: &str)
        -> Result<Option<Service>, CatalogError>;
    async fn create(&self, fields: ServiceFields) -> Result<Service, CatalogError>;
    async fn update(&self, id: Uuid, fields: ServiceFields) -> Result<Service, CatalogError>;
    async fn delete(&self, id: Uuid) -> Result<(), CatalogError>;

    /// Whether any appointment still points at this service.
    async fn is_referenced(&self, id: Uuid) -> Result<bool, CatalogError>;
}

pub struct SupabaseServiceStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseServiceStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn find_one(&self, filter: &str) -> Result<Option<Service>, CatalogError> {
        let path = format!("/rest/v1/services?{}&limit=1", filter);
        let mut rows: Vec<Service> = self
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
}

fn db_err(e: anyhow::Error) -> CatalogError {
    CatalogError::Database(e.to_string())
}

fn fields_body(fields: &ServiceFields) -> Value {
    json!({
        "name": fields.name,
        "price": fields.price,
        "description": fields.description,
    })
}

#[async_trait]
impl ServiceCatalog for SupabaseServiceStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, CatalogError> {
        self.find_one(&format!("id=eq.{}", id)).await
    }
}

#[async_trait]
impl ServiceStore for SupabaseServiceStore {
    async fn list(&self) -> Result<Vec<Service>, CatalogError> {
        self.supabase
            .request(Method::GET, "/rest/v1/services?order=name.asc", None)
            .await
            .map_err(db_err)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Service>, CatalogError> {
        self.find_one(&format!("name=eq.{}", urlencoding::encode(name)))
            .await
    }

    async fn find_by_description(
        &self,
        description: &str,
    ) -> Result<Option<Service>, CatalogError> {
        self.find_one(&format!(
            "description=eq.{}",
            urlencoding::encode(description)
        ))
        .await
    }

    async fn create(&self, fields: ServiceFields) -> Result<Service, CatalogError> {
        let mut rows: Vec<Service> = self
            .supabase
            .request_returning(Method::POST, "/rest/v1/services", Some(fields_body(&fields)))
            .await
            .map_err(db_err)?;

        if rows.is_empty() {
            return Err(CatalogError::Database(
                "insert returned no representation".to_string(),
            ));
        }
        Ok(rows.remove(0))
    }

    async fn update(&self, id: Uuid, fields: ServiceFields) -> Result<Service, CatalogError> {
        let path = format!("/rest/v1/services?id=eq.{}", id);
        let mut rows: Vec<Service> = self
            .supabase
            .request_returning(Method::PATCH, &path, Some(fields_body(&fields)))
            .await
            .map_err(db_err)?;

        if rows.is_empty() {
            return Err(CatalogError::NotFound);
        }
        Ok(rows.remove(0))
    }

    async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        let path = format!("/rest/v1/services?id=eq.{}", id);
        let rows: Vec<Service> = self
            .supabase
            .request_returning(Method::DELETE, &path, None)
            .await
            .map_err(db_err)?;

        if rows.is_empty() {
            return Err(CatalogError::NotFound);
        }
        Ok(())
    }

    async fn is_referenced(&self, id: Uuid) -> Result<bool, CatalogError> {
        let path = format!("/rest/v1/appointments?service_id=eq.{}&limit=1", id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)?;

        Ok(!rows.is_empty())
    }
}
