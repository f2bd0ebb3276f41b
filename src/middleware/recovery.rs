// middleware/recovery.rs - turn handler panics into 500 envelopes

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::ApiError;

pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Per-request fault boundary. A panic while serving one request is logged
/// and answered with a generic Internal error; the worker keeps running.
pub fn recovery_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "Panic recovered while handling request");
    ApiError::internal_server_error("Internal server error").into_response()
}
