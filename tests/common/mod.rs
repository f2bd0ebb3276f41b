#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use users_api::config::{AppConfig, ServerConfig};
use users_api::database::{InMemoryUserRepository, UserRepository};
use users_api::server;
use users_api::state::AppState;

/// In-process server on a free port, backed by the supplied repository.
/// Stops when dropped.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(Arc::new(InMemoryUserRepository::new())).await
    }

    pub async fn spawn_with(repository: Arc<dyn UserRepository>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = server_config(port);
        let listener = TcpListener::bind(config.address())
            .await
            .with_context(|| format!("failed to bind {}", config.address()))?;

        let app = server::app(AppState::new(repository), &config);
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server::serve_until(listener, app, &config, async move {
                let _ = stopped.await;
            })
            .await
        });

        let server = Self {
            port,
            base_url,
            stop: Some(stop),
            handle,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Trigger graceful shutdown and wait for the serve loop to return
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        (&mut self.handle).await.context("server task panicked")??;
        Ok(())
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

pub fn server_config(port: u16) -> ServerConfig {
    let mut config = AppConfig::from_lookup(|_| None).server;
    config.host = "127.0.0.1".to_string();
    config.port = port;
    config.shutdown_timeout_secs = 5;
    config
}

/// Create a user through the API and return its `data` object
pub async fn create_user(server: &TestServer, name: &str, email: &str) -> Result<serde_json::Value> {
    let res = reqwest::Client::new()
        .post(server.url("/api/users"))
        .json(&serde_json::json!({ "name": name, "email": email }))
        .send()
        .await?;

    anyhow::ensure!(res.status() == StatusCode::CREATED, "expected 201 Created, got {}", res.status());
    let body = res.json::<serde_json::Value>().await?;
    Ok(body["data"].clone())
}
