use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use atfi_checkin_server::config::Config;
use atfi_checkin_server::registry::{InMemoryRegistry, ParticipantRegistry, PgRegistry};
use atfi_checkin_server::routes::create_routes;
use atfi_checkin_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    let registry: Arc<dyn ParticipantRegistry> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Successfully connected to database");

            sqlx::migrate!()
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations run successfully");

            Arc::new(PgRegistry::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, registrations are kept in memory");
            Arc::new(InMemoryRegistry::new())
        }
    };

    let state = AppState::new(registry, config.qr_max_age_hours);
    let app = create_routes(state, &config);

    tracing::info!("Check-in server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
