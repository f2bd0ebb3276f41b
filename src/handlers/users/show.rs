// handlers/users/show.rs - GET /api/users/:id handler

use axum::extract::State;

use crate::database::models::UserResponse;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::UserId;

pub async fn users_show(State(state): State<AppState>, UserId(id): UserId) -> ApiResult<UserResponse> {
    let user = state
        .users
        .get_user_by_id(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to retrieve user"))?;

    Ok(ApiResponse::success(user))
}
