// Buddy Match API server

use anyhow::{Context, Result};
use buddy_core::kernel::postgres::MIGRATOR;
use buddy_core::{server::build_app, Config};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,buddy_core=debug,sqlx=warn";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = connect(&config).await?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Schema up to date");

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, search_radius_km = config.default_search_radius_km, "Buddy Match API listening");

    axum::serve(listener, build_app(pool.clone(), &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Shut down cleanly");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    info!(max_connections = config.db_max_connections, "Database connected");
    Ok(pool)
}

/// Resolves on Ctrl-C so in-flight match transitions can finish
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
