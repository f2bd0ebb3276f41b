// handlers/users/list.rs - GET /api/users handler

use axum::extract::State;

use crate::database::models::UserResponse;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/users - every user, most recently created first.
/// An empty table is an empty list, not an error.
pub async fn users_list(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    let users = state
        .users
        .get_all_users()
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to retrieve users"))?;

    Ok(ApiResponse::success(users))
}
