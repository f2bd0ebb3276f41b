use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;

/// Storage capability for users. The service layer only sees this trait, so
/// it can run against Postgres in production and in memory under test.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, most recently created first
    async fn get_all(&self) -> Result<Vec<User>, DatabaseError>;

    async fn get_by_id(&self, id: i32) -> Result<User, DatabaseError>;

    /// Lookup used for uniqueness checks; not exposed over HTTP
    async fn get_by_email(&self, email: &str) -> Result<User, DatabaseError>;

    /// Insert a user. The store assigns the id and both timestamps.
    async fn create(&self, name: &str, email: &str) -> Result<User, DatabaseError>;

    async fn update(&self, id: i32, name: &str, email: &str) -> Result<User, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<(), DatabaseError>;

    /// Connectivity probe
    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at, updated_at
             FROM users
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_by_id(&self, id: i32) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at, updated_at
             FROM users
             WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, format!("user with ID {} not found", id)))
    }

    async fn get_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at, updated_at
             FROM users
             WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, format!("user with email {} not found", email)))
    }

    async fn create(&self, name: &str, email: &str) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email)
             VALUES ($1, $2)
             RETURNING id, name, email, created_at, updated_at",
        )
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "inserted user not returned"))?;

        tracing::debug!(user_id = user.id, "Inserted user row");
        Ok(user)
    }

    async fn update(&self, id: i32, name: &str, email: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "UPDATE users
             SET name = $1, email = $2
             WHERE id = $3
             RETURNING id, name, email, created_at, updated_at",
        )
        .bind(name)
        .bind(email)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, format!("user with ID {} not found", id)))
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user with ID {} not found", id)));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
