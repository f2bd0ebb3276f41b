use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS: any origin and header, the CRUD verbs plus preflight,
/// no credentials.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
