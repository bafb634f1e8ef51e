// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::kpi_service::KpiService;
use crate::application::trip_repository::TripRepository;
use crate::application::view_service::ViewService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::memory_repository::MemoryRepository;
use crate::infrastructure::mongo_repository::{ConnectionProvider, MongoRepository};
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer). MongoDB is not contacted
    // until the first request needs it.
    let repository: Arc<dyn TripRepository> = match &config.datastore.fixture {
        Some(path) => Arc::new(MemoryRepository::from_json_file(path)?),
        None => {
            tracing::info!(
                "Using MongoDB collection {}.{}",
                config.datastore.database,
                config.datastore.collection
            );
            Arc::new(MongoRepository::new(ConnectionProvider::new(
                config.datastore.clone(),
            )))
        }
    };

    // Create services (application layer)
    let kpi_service = KpiService::new(repository.clone());
    let view_service = ViewService::new(repository);
    let dashboard_service = DashboardService::new(
        config.server.title.clone(),
        kpi_service.clone(),
        view_service.clone(),
    );

    // Create application state
    let state = Arc::new(AppState {
        kpi_service,
        view_service,
        dashboard_service,
    });

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting taxi-analytics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
