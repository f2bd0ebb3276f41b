// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::services::ServiceError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError(Vec<String>),
    InvalidJson(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 408 Request Timeout
    RequestTimeout(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),

    // Any other status raised by the framework or a middleware layer
    Status(StatusCode, String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Status(status, _) => *status,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::ValidationError(errors) => errors.join("; "),
            ApiError::BadRequest(msg)
            | ApiError::InvalidJson(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::RequestTimeout(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Status(_, msg) => msg.clone(),
        }
    }

    /// Convert to the failure envelope:
    /// `{"success": false, "error": {"error", "message", "code"}}`
    pub fn to_json(&self) -> Value {
        let status = self.status_code();
        json!({
            "success": false,
            "error": {
                "error": status.canonical_reason().unwrap_or("Unknown"),
                "message": self.message(),
                "code": status.as_u16()
            }
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(errors: Vec<String>) -> Self {
        ApiError::ValidationError(errors)
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    /// Error for a status produced without a body, e.g. by routing or a
    /// timeout layer. 5xx never carry more than the generic message.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => ApiError::not_found("Route not found"),
            StatusCode::METHOD_NOT_ALLOWED => ApiError::MethodNotAllowed("Method not allowed".to_string()),
            StatusCode::REQUEST_TIMEOUT => ApiError::RequestTimeout("Request timed out".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR => ApiError::internal_server_error("Internal server error"),
            status if status.is_server_error() => ApiError::Status(status, "Internal server error".to_string()),
            status => ApiError::Status(status, status.canonical_reason().unwrap_or("Request failed").to_string()),
        }
    }

    /// Map a service outcome, using `internal_message` as the client-facing
    /// text when the failure is internal. The real cause only goes to the log.
    pub fn from_service(err: ServiceError, internal_message: &str) -> Self {
        match err {
            ServiceError::NotFound(_) => ApiError::not_found("User not found"),
            ServiceError::Conflict => ApiError::conflict("Email already exists"),
            ServiceError::Internal(detail) => {
                tracing::error!(error = %detail, "{}", internal_message);
                ApiError::internal_server_error(internal_message)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::from_service(err, "An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
