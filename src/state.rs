use std::sync::Arc;

use crate::database::repository::UserRepository;
use crate::services::UserService;

/// Shared handler state, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

impl AppState {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            users: UserService::new(repository),
        }
    }
}
