// handlers/users/mod.rs - User CRUD handlers
//
// Each handler decodes its input, runs format validation, calls the
// UserService and maps the outcome to the response envelope.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::validation::{sanitize_string, validate_user_input};

pub mod create; // POST /api/users
pub mod delete; // DELETE /api/users/:id
pub mod list; // GET /api/users
pub mod show; // GET /api/users/:id
pub mod update; // PUT /api/users/:id

pub use create::users_create;
pub use delete::users_delete;
pub use list::users_list;
pub use show::users_show;
pub use update::users_update;

/// `:id` path segment parsed as a user id. Anything that is not an integer
/// is rejected with 400 before a handler runs.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid user ID"))?;

        raw.parse::<i32>()
            .map(UserId)
            .map_err(|_| ApiError::bad_request("Invalid user ID"))
    }
}

/// JSON request body. Decodes regardless of `Content-Type` and reports any
/// failure as a 400 in the standard envelope.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(%rejection, "Failed to read request body");
            ApiError::bad_request("Failed to read request body")
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!(error = %e, "Rejected JSON payload");
            ApiError::invalid_json("Invalid JSON payload")
        })
    }
}

/// Normalise whitespace in both fields and enforce the name/email format
/// rules. Returns the cleaned values.
pub(crate) fn sanitize_and_validate(name: &str, email: &str) -> Result<(String, String), ApiError> {
    let name = sanitize_string(name);
    let email = sanitize_string(email);

    let errors = validate_user_input(&name, &email);
    if !errors.is_empty() {
        return Err(ApiError::validation_error(errors));
    }

    Ok((name, email))
}
