// handlers/health.rs - liveness, readiness and service info

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// GET /health - process liveness. Never touches the database, so it stays
/// 200 while the store is down.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": timestamp()
    }))
}

/// GET /ready - 200 when the store answers a ping, 503 otherwise
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.users.check_storage().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "timestamp": timestamp(),
                "database": "ok"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            ApiError::service_unavailable("Database unavailable").into_response()
        }
    }
}

/// GET / - service name, version and endpoint map
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Users API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "users": "/api/users[/:id]",
                "health": "/health",
                "ready": "/ready"
            }
        }
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
