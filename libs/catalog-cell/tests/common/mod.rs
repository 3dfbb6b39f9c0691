use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use catalog_cell::models::{CatalogError, Service, ServiceFields};
use catalog_cell::service::CatalogService;
use catalog_cell::store::{ServiceCatalog, ServiceStore};

/// Store double backed by a plain Vec; appointments referencing a service
/// are simulated with an explicit id set.
#[derive(Default)]
pub struct InMemoryServiceStore {
    services: RwLock<Vec<Service>>,
    referenced: RwLock<HashSet<Uuid>>,
}

impl InMemoryServiceStore {
    pub async fn mark_referenced(&self, id: Uuid) {
        self.referenced.write().await.insert(id);
    }

    pub async fn seed(&self, name: &str, price: f64, description: &str) -> Service {
        let service = Service {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price,
            description: description.to_string(),
        };
        self.services.write().await.push(service.clone());
        service
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryServiceStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, CatalogError> {
        Ok(self.services.read().await.iter().find(|s| s.id == id).cloned())
    }
}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn list(&self) -> Result<Vec<Service>, CatalogError> {
        let mut services = self.services.read().await.clone();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Service>, CatalogError> {
        Ok(self
            .services
            .read()
            .await
            .iter()
            .find(|s| s.name == name)
            .cloned())
    }

    async fn find_by_description(
        &self,
        description: &str,
    ) -> Result<Option<Service>, CatalogError> {
        Ok(self
            .services
            .read()
            .await
            .iter()
            .find(|s| s.description == description)
            .cloned())
    }

    async fn create(&self, fields: ServiceFields) -> Result<Service, CatalogError> {
        let service = Service {
            id: Uuid::new_v4(),
            name: fields.name,
            price: fields.price,
            description: fields.description,
        };
        self.services.write().await.push(service.clone());
        Ok(service)
    }

    async fn update(&self, id: Uuid, fields: ServiceFields) -> Result<Service, CatalogError> {
        let mut services = self.services.write().await;
        let service = services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CatalogError::NotFound)?;
        service.name = fields.name;
        service.price = fields.price;
        service.description = fields.description;
        Ok(service.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        let mut services = self.services.write().await;
        let before = services.len();
        services.retain(|s| s.id != id);
        if services.len() == before {
            return Err(CatalogError::NotFound);
        }
        Ok(())
    }

    async fn is_referenced(&self, id: Uuid) -> Result<bool, CatalogError> {
        Ok(self.referenced.read().await.contains(&id))
    }
}

pub fn catalog_with_store() -> (CatalogService, Arc<InMemoryServiceStore>) {
    let store = Arc::new(InMemoryServiceStore::default());
    (CatalogService::new(store.clone()), store)
}
