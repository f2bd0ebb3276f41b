use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use users_api::cli::{Cli, Commands};
use users_api::config::AppConfig;
use users_api::database::{schema, DatabaseManager, PgUserRepository};
use users_api::state::AppState;
use users_api::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DB_* and SERVER_* settings
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::from_env());

    if cli.action() == Commands::Config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    logging::init(&config.logging)?;
    tracing::info!(environment = ?config.environment, "Starting users-api");
    tracing::debug!(?config, "Loaded configuration");

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    if let Err(e) = schema::ensure_schema(&pool).await {
        DatabaseManager::close(&pool).await;
        return Err(e).context("failed to initialize database schema");
    }

    if cli.action() == Commands::Migrate {
        tracing::info!("Schema is up to date");
        DatabaseManager::close(&pool).await;
        return Ok(());
    }

    let repository = Arc::new(PgUserRepository::new(pool.clone()));
    let app = server::app(AppState::new(repository), &config.server);

    let address = config.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    let result = server::serve(listener, app, &config.server).await;

    DatabaseManager::close(&pool).await;
    tracing::info!("Database connections closed");

    result.context("server error")
}
