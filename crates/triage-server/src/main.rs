//! Triage Server — application entry point.

use tracing_subscriber::EnvFilter;
use triage_db::{DbConfig, DbManager};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("triage=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting triage server...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(m) => m,
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(err) = triage_db::run_migrations(manager.client()).await {
        tracing::error!(error = %err, "migrations failed");
        std::process::exit(1);
    }

    tracing::info!("Schema ready.");

    // TODO: Start REST API server binding the workflow and comment services

    tracing::info!("Triage server stopped.");
}
