// database/schema.rs - idempotent DDL for the users table

use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(255) UNIQUE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#;

const CREATE_UPDATED_AT_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION update_updated_at_column()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql"#;

const DROP_UPDATED_AT_TRIGGER: &str =
    "DROP TRIGGER IF EXISTS update_users_updated_at ON users";

const CREATE_UPDATED_AT_TRIGGER: &str = r#"
CREATE TRIGGER update_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW
    EXECUTE FUNCTION update_updated_at_column()"#;

/// Statements in execution order. Each is a single statement so it can go
/// through the extended query protocol.
pub const STATEMENTS: [&str; 4] = [
    CREATE_USERS_TABLE,
    CREATE_UPDATED_AT_FUNCTION,
    DROP_UPDATED_AT_TRIGGER,
    CREATE_UPDATED_AT_TRIGGER,
];

/// Create the users table and its `updated_at` trigger if they are missing.
/// Safe to run on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Database schema is up to date");
    Ok(())
}
