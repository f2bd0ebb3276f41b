// handlers/users/delete.rs - DELETE /api/users/:id handler

use axum::extract::State;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::UserId;

pub async fn users_delete(State(state): State<AppState>, UserId(id): UserId) -> ApiResult<()> {
    state
        .users
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete user"))?;

    Ok(ApiResponse::no_content())
}
