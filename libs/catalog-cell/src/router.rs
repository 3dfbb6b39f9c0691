use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::service::CatalogService;

pub fn catalog_routes(config: Arc<AppConfig>, catalog: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_services))
        .route("/", post(handlers::create_service))
        .route("/{service_id}", get(handlers::get_service))
        .route("/{service_id}", put(handlers::update_service))
        .route("/{service_id}", delete(handlers::delete_service))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(catalog)
}
