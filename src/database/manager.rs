use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the persistence layer, already classified for callers
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database configuration: {0}")]
    ConfigInvalid(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Sort a driver error into the taxonomy: missing rows become `NotFound`,
    /// unique-constraint violations (SQLSTATE 23505) become `Conflict`, and
    /// everything else stays opaque.
    pub fn classify(err: sqlx::Error, not_found: impl Into<String>) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound(not_found.into()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DatabaseError::Conflict("email already exists".to_string())
            }
            other => DatabaseError::Sqlx(other),
        }
    }
}

/// Owns construction and teardown of the connection pool. Built once in
/// `main` and handed to the repository.
pub struct DatabaseManager;

impl DatabaseManager {
    pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DatabaseError> {
        let ssl_mode = PgSslMode::from_str(&config.ssl_mode).map_err(|_| {
            DatabaseError::ConfigInvalid(format!("unknown sslmode '{}'", config.ssl_mode))
        })?;

        Ok(PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(ssl_mode))
    }

    /// Open the pool and verify connectivity with a round trip
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let options = Self::connect_options(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await?;

        Self::health_check(&pool).await?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            max_connections = config.max_connections,
            "Database connected"
        );
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to come back
    pub async fn close(pool: &PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}
