use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::database::repository::UserRepository;

/// Domain outcomes of the user service. Nothing here knows about SQL or HTTP.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user not found: {0}")]
    NotFound(String),

    #[error("email already exists")]
    Conflict,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ServiceError::NotFound(msg),
            DatabaseError::Conflict(_) => ServiceError::Conflict,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Business rules for users on top of a `UserRepository`
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all_users(&self) -> ServiceResult<Vec<UserResponse>> {
        let users = self.repository.get_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_user_by_id(&self, id: i32) -> ServiceResult<UserResponse> {
        let user = self.repository.get_by_id(id).await?;
        Ok(user.into())
    }

    /// Create a user after an optimistic email check.
    ///
    /// The lookup and the insert are separate statements, so two requests can
    /// both pass the check; the unique constraint on `users.email` decides
    /// the race and the loser gets `Conflict` from `create`.
    pub async fn create_user(&self, req: CreateUserRequest) -> ServiceResult<UserResponse> {
        if self.email_owner(&req.email).await?.is_some() {
            return Err(ServiceError::Conflict);
        }

        let user = self.repository.create(&req.name, &req.email).await?;
        info!(user_id = user.id, "Created user");
        Ok(user.into())
    }

    pub async fn update_user(&self, id: i32, req: UpdateUserRequest) -> ServiceResult<UserResponse> {
        // Target must exist before anything else is checked
        self.repository.get_by_id(id).await?;

        match self.email_owner(&req.email).await? {
            Some(owner) if owner != id => return Err(ServiceError::Conflict),
            _ => {}
        }

        let user = self.repository.update(id, &req.name, &req.email).await?;
        info!(user_id = user.id, "Updated user");
        Ok(user.into())
    }

    pub async fn delete_user(&self, id: i32) -> ServiceResult<()> {
        self.repository.delete(id).await?;
        info!(user_id = id, "Deleted user");
        Ok(())
    }

    /// Readiness probe for the backing store
    pub async fn check_storage(&self) -> ServiceResult<()> {
        self.repository.ping().await?;
        Ok(())
    }

    /// Id of the user holding `email`, if any
    async fn email_owner(&self, email: &str) -> ServiceResult<Option<i32>> {
        match self.repository.get_by_email(email).await {
            Ok(user) => Ok(Some(user.id)),
            Err(DatabaseError::NotFound(_)) => Ok(None),
            Err(other) => Err(other.into()),
        }
    }
}
