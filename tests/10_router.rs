//! Router-level tests: the full middleware stack driven with `oneshot`,
//! no socket involved.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceExt; // For oneshot()

use users_api::config::AppConfig;
use users_api::database::models::User;
use users_api::database::{DatabaseError, InMemoryUserRepository, UserRepository};
use users_api::middleware::recovery_layer;
use users_api::server;
use users_api::state::AppState;

/// Store whose every call fails the way a dropped pool does
struct UnavailableRepository;

fn unavailable() -> DatabaseError {
    DatabaseError::Sqlx(sqlx::Error::PoolClosed)
}

#[async_trait]
impl UserRepository for UnavailableRepository {
    async fn get_all(&self) -> Result<Vec<User>, DatabaseError> {
        Err(unavailable())
    }

    async fn get_by_id(&self, _id: i32) -> Result<User, DatabaseError> {
        Err(unavailable())
    }

    async fn get_by_email(&self, _email: &str) -> Result<User, DatabaseError> {
        Err(unavailable())
    }

    async fn create(&self, _name: &str, _email: &str) -> Result<User, DatabaseError> {
        Err(unavailable())
    }

    async fn update(&self, _id: i32, _name: &str, _email: &str) -> Result<User, DatabaseError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: i32) -> Result<(), DatabaseError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(unavailable())
    }
}

/// In-memory store whose listing stalls longer than the write timeout
struct StalledListRepository {
    inner: InMemoryUserRepository,
    delay: Duration,
}

#[async_trait]
impl UserRepository for StalledListRepository {
    async fn get_all(&self) -> Result<Vec<User>, DatabaseError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_all().await
    }

    async fn get_by_id(&self, id: i32) -> Result<User, DatabaseError> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        self.inner.get_by_email(email).await
    }

    async fn create(&self, name: &str, email: &str) -> Result<User, DatabaseError> {
        self.inner.create(name, email).await
    }

    async fn update(&self, id: i32, name: &str, email: &str) -> Result<User, DatabaseError> {
        self.inner.update(id, name, email).await
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        self.inner.delete(id).await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.inner.ping().await
    }
}

fn app_with(repository: Arc<dyn UserRepository>) -> Router {
    let config = AppConfig::from_lookup(|_| None);
    server::app(AppState::new(repository), &config.server)
}

fn app() -> Router {
    app_with(Arc::new(InMemoryUserRepository::new()))
}

// Helper to parse JSON response body
async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_describes_the_service() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Users API");
}

#[tokio::test]
async fn ready_reports_ok_when_store_answers() {
    let response = app()
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn store_outage_is_unavailable_not_unhealthy() {
    let app = app_with(Arc::new(UnavailableRepository));

    let response = app
        .clone()
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Database unavailable");

    // Liveness never consults the store
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn storage_failures_hide_details() {
    let app = app_with(Arc::new(UnavailableRepository));

    let response = app
        .clone()
        .oneshot(Request::get("/api/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": {
                "error": "Internal Server Error",
                "message": "Failed to retrieve users",
                "code": 500
            }
        })
    );

    let request = Request::post("/api/users")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"Ada Lovelace","email":"ada@example.com"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Failed to create user");
}

#[tokio::test]
async fn body_decodes_without_content_type() {
    let request = Request::post("/api/users")
        .body(Body::from(r#"{"name":"Ada Lovelace","email":"ada@example.com"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["id"], 1);
}

#[tokio::test]
async fn validation_runs_before_lookup() {
    // Invalid payload against a missing id reports the payload problem
    let request = Request::put("/api/users/42")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"","email":"ada@example.com"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "Name is required");
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/users")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

async fn explode() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn panics_become_internal_errors() {
    let app = Router::new()
        .route("/boom", get(explode))
        .route("/fine", get(|| async { "fine" }))
        .layer(recovery_layer());

    let response = app
        .clone()
        .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "Internal server error");

    // The service keeps answering afterwards
    let response = app
        .oneshot(Request::get("/fine").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test(start_paused = true)]
async fn handler_timeout_uses_the_error_envelope() {
    let mut config = AppConfig::from_lookup(|_| None);
    config.server.write_timeout_secs = 1;
    let repository = StalledListRepository {
        inner: InMemoryUserRepository::new(),
        delay: Duration::from_secs(3),
    };
    let app = server::app(AppState::new(Arc::new(repository)), &config.server);

    let response = app
        .oneshot(Request::get("/api/users").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": {
                "error": "Request Timeout",
                "message": "Request timed out",
                "code": 408
            }
        })
    );
}

#[tokio::test]
async fn unsupported_method_uses_the_error_envelope() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::PATCH)
                .uri("/api/users/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().get("allow").is_some());
    assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], 405);
    assert_eq!(body["error"]["message"], "Method not allowed");
}
