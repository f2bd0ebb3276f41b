// middleware/envelope.rs - give bodiless error responses the failure envelope

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Rewrite 4xx/5xx responses that carry no `Content-Type` (axum's 405,
/// tower-http's 408) into the standard JSON failure envelope. Status and
/// non-body headers such as `Allow` are kept.
pub async fn envelope_bare_errors(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error())
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let (parts, _body) = response.into_parts();
    let mut enveloped = ApiError::from_status(status).into_response();

    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_LENGTH && name != header::CONTENT_TYPE {
            enveloped.headers_mut().append(name.clone(), value.clone());
        }
    }

    enveloped
}
