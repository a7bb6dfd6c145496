use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use coachline_api::{app, AppState};
use coachline_core::{
    InMemoryTripRepository, InMemoryVehicleRepository, TripRepository, VehicleRepository,
};
use coachline_store::{app_config::Config, DbClient, PostgresTripRepository, PostgresVehicleRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coachline_api=debug,coachline_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Coachline API on port {}", config.server.port);

    let db = DbClient::from_config(&config.database)
        .await
        .context("Failed to connect to Postgres")?;

    let (vehicle_repo, trip_repo): (Arc<dyn VehicleRepository>, Arc<dyn TripRepository>) = match db {
        Some(db) => {
            db.migrate().await.context("Failed to run migrations")?;
            (
                Arc::new(PostgresVehicleRepository::new(db.pool.clone())),
                Arc::new(PostgresTripRepository::new(db.pool)),
            )
        }
        None => {
            tracing::warn!("No database.url configured, using in-memory repositories");
            (
                Arc::new(InMemoryVehicleRepository::new()),
                Arc::new(InMemoryTripRepository::new()),
            )
        }
    };

    // Seat status broadcast channel
    let (events_tx, _) = tokio::sync::broadcast::channel(100);

    let app_state = AppState::new(vehicle_repo, trip_repo, config.fleet.clone(), events_tx);
    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
