// handlers/users/create.rs - POST /api/users handler

use axum::extract::State;

use crate::database::models::{CreateUserRequest, UserResponse};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::{sanitize_and_validate, JsonBody};

/**
 * POST /api/users - Create a user
 *
 * Expected Input:
 * ```json
 * { "name": "Ada Lovelace", "email": "ada@example.com" }
 * ```
 *
 * 201 with the new user, 400 on malformed JSON or invalid fields,
 * 409 when the email is already registered.
 */
pub async fn users_create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    let (name, email) = sanitize_and_validate(&req.name, &req.email)?;

    let user = state
        .users
        .create_user(CreateUserRequest { name, email })
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create user"))?;

    Ok(ApiResponse::created(user))
}
