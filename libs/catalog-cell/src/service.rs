use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_models::auth::ActorRole;

use crate::models::{CatalogError, Service, ServiceFields};
use crate::store::ServiceStore;

/// Catalog operations with their permission and uniqueness rules.
/// Role gating happens here, with the role passed in explicitly.
pub struct CatalogService {
    store: Arc<dyn ServiceStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn ServiceStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Service>, CatalogError> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Service, CatalogError> {
        self.store.find_by_id(id).await?.ok_or(CatalogError::NotFound)
    }

    pub async fn create(
        &self,
        role: ActorRole,
        fields: ServiceFields,
    ) -> Result<Service, CatalogError> {
        if !role.is_admin() {
            return Err(CatalogError::AdminRequired);
        }

        let fields = validate_fields(fields)?;
        self.check_duplicates(&fields, None).await?;

        let service = self.store.create(fields).await?;
        info!("Service {} created: {}", service.id, service.name);
        Ok(service)
    }

    pub async fn update(
        &self,
        role: ActorRole,
        id: Uuid,
        fields: ServiceFields,
    ) -> Result<Service, CatalogError> {
        if !role.is_admin() {
            return Err(CatalogError::AdminRequired);
        }

        if self.store.find_by_id(id).await?.is_none() {
            return Err(CatalogError::NotFound);
        }

        let fields = validate_fields(fields)?;
        self.check_duplicates(&fields, Some(id)).await?;

        let service = self.store.update(id, fields).await?;
        info!("Service {} updated", service.id);
        Ok(service)
    }

    pub async fn delete(&self, role: ActorRole, id: Uuid) -> Result<(), CatalogError> {
        if !role.is_admin() {
            return Err(CatalogError::AdminRequired);
        }

        if self.store.find_by_id(id).await?.is_none() {
            return Err(CatalogError::NotFound);
        }

        if self.store.is_referenced(id).await? {
            debug!("Refusing to delete referenced service {}", id);
            return Err(CatalogError::Referenced);
        }

        self.store.delete(id).await?;
        info!("Service {} deleted", id);
        Ok(())
    }

    async fn check_duplicates(
        &self,
        fields: &ServiceFields,
        exclude: Option<Uuid>,
    ) -> Result<(), CatalogError> {
        if let Some(existing) = self.store.find_by_name(&fields.name).await? {
            if Some(existing.id) != exclude {
                return Err(CatalogError::Duplicate("name"));
            }
        }

        if let Some(existing) = self.store.find_by_description(&fields.description).await? {
            if Some(existing.id) != exclude {
                return Err(CatalogError::Duplicate("description"));
            }
        }

        Ok(())
    }
}

fn validate_fields(fields: ServiceFields) -> Result<ServiceFields, CatalogError> {
    let name = fields.name.trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::Validation("service name is required".to_string()));
    }

    let description = fields.description.trim().to_string();
    if description.is_empty() {
        return Err(CatalogError::Validation(
            "service description is required".to_string(),
        ));
    }

    if !fields.price.is_finite() || fields.price < 0.0 {
        return Err(CatalogError::Validation(
            "service price must be a non-negative amount".to_string(),
        ));
    }

    Ok(ServiceFields {
        name,
        price: fields.price,
        description,
    })
}
