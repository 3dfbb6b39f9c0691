mod router;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_cell::service::CatalogService;
use catalog_cell::store::SupabaseServiceStore;
use scheduling_cell::services::scheduler::AppointmentScheduler;
use scheduling_cell::store::SupabaseAppointmentStore;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinic_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(AppConfig::from_env());
    if !config.is_configured() {
        warn!("Supabase credentials missing; API calls to the database will fail");
    }

    let supabase = Arc::new(SupabaseClient::new(&config));

    let service_store = Arc::new(SupabaseServiceStore::new(supabase.clone()));
    let catalog = Arc::new(CatalogService::new(service_store.clone()));

    let appointment_store = Arc::new(SupabaseAppointmentStore::new(supabase));
    let scheduler = Arc::new(AppointmentScheduler::new(
        service_store,
        appointment_store,
        config.clinic_timezone,
    ));

    let app = router::app_router(config, catalog, scheduler);

    let addr = "0.0.0.0:3000";
    info!("Clinic API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
