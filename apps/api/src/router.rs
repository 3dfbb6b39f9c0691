use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use catalog_cell::router::catalog_routes;
use catalog_cell::service::CatalogService;
use scheduling_cell::router::appointment_routes;
use scheduling_cell::services::scheduler::AppointmentScheduler;
use shared_config::AppConfig;

pub fn app_router(
    config: Arc<AppConfig>,
    catalog: Arc<CatalogService>,
    scheduler: Arc<AppointmentScheduler>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .nest("/services", catalog_routes(config.clone(), catalog))
        .nest("/appointments", appointment_routes(config, scheduler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health() -> &'static str {
    "Clinic API is running"
}
