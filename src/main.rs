//! car-service server entry point.
//!
//! Loads configuration, installs tracing, opens storage, and serves the
//! REST API until SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::{Context, anyhow};

use car_service::api;
use car_service::app_state::AppState;
use car_service::config::ServiceConfig;
use car_service::persistence::{CarRepository, InMemoryCarRepository, PostgresCarRepository};
use car_service::server;
use car_service::service::{CarCatalog, CarService};
use car_service::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServiceConfig::from_env().context("failed to load configuration")?;

    // Initialize tracing
    telemetry::init(config.environment).map_err(|e| anyhow!(e))?;
    tracing::info!(
        addr = %config.listen_addr,
        environment = %config.environment,
        "starting car-service"
    );

    // Build persistence layer
    let postgres = if config.persistence_enabled {
        let repository = PostgresCarRepository::connect(&config.database)
            .await
            .context("failed to connect to PostgreSQL")?;
        repository
            .run_migrations()
            .await
            .context("failed to run database migrations")?;
        tracing::info!("database migrations applied");
        Some(Arc::new(repository))
    } else {
        tracing::warn!("persistence disabled, records are kept in memory only");
        None
    };
    let repository: Arc<dyn CarRepository> = match &postgres {
        Some(pg) => Arc::clone(pg) as Arc<dyn CarRepository>,
        None => Arc::new(InMemoryCarRepository::new()),
    };

    // Build service layer
    let car_service: Arc<dyn CarService> = Arc::new(CarCatalog::new(repository));

    // Build router
    let app = api::build_app(AppState::new(car_service), config.request_timeout());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    server::run(
        listener,
        app,
        config.shutdown_grace(),
        server::shutdown_signal(),
    )
    .await?;

    if let Some(pg) = postgres {
        pg.close().await;
        tracing::info!("database connections closed");
    }

    tracing::info!("server exited");
    Ok(())
}
