use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::User;
use crate::database::repository::UserRepository;

/// In-memory `UserRepository` (for development/testing).
///
/// Mirrors the Postgres contract: serial ids starting at 1, a unique email
/// constraint checked under the write lock, equal timestamps on insert and
/// `updated_at` refreshed on every update.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    next_id: i32,
    users: BTreeMap<i32, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

fn not_found(id: i32) -> DatabaseError {
    DatabaseError::NotFound(format!("user with ID {} not found", id))
}

fn duplicate_email() -> DatabaseError {
    DatabaseError::Conflict("email already exists".to_string())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, DatabaseError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn get_by_id(&self, id: i32) -> Result<User, DatabaseError> {
        let state = self.state.read().await;
        state.users.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    async fn get_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("user with email {} not found", email)))
    }

    async fn create(&self, name: &str, email: &str) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        if state.email_taken(email, None) {
            return Err(duplicate_email());
        }

        state.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, name: &str, email: &str) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Err(not_found(id));
        }
        if state.email_taken(email, Some(id)) {
            return Err(duplicate_email());
        }

        let user = state.users.get_mut(&id).ok_or_else(|| not_found(id))?;
        user.name = name.to_string();
        user.email = email.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        state.users.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
