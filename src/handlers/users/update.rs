// handlers/users/update.rs - PUT /api/users/:id handler

use axum::extract::State;

use crate::database::models::{UpdateUserRequest, UserResponse};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::{sanitize_and_validate, JsonBody, UserId};

/// PUT /api/users/:id - replace name and email. Both fields are required;
/// sending the user's current email back is allowed.
pub async fn users_update(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let (name, email) = sanitize_and_validate(&req.name, &req.email)?;

    let user = state
        .users
        .update_user(id, UpdateUserRequest { name, email })
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update user"))?;

    Ok(ApiResponse::success(user))
}
