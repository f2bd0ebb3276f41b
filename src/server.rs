use std::future::IntoFuture;
use std::sync::Arc;

use axum::{middleware::map_response, routing::get, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Notify;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::handlers;
use crate::middleware::{cors_layer, envelope_bare_errors, recovery_layer, trace_layer};
use crate::state::AppState;

/// Full application router: routes plus the middleware stack.
///
/// Outermost first: CORS, request logging, the error envelope for bodiless
/// 4xx/5xx, read/write timeouts, panic recovery, then the handlers.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .merge(user_routes())
        .fallback(handlers::not_found)
        .with_state(state)
        // Global middleware
        .layer(recovery_layer())
        .layer(TimeoutLayer::new(config.write_timeout()))
        .layer(RequestBodyTimeoutLayer::new(config.read_timeout()))
        // Inside CORS so the rewritten response still gets CORS headers
        .layer(map_response(envelope_bare_errors))
        .layer(trace_layer())
        .layer(cors_layer())
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/api/users", get(users::users_list).post(users::users_create))
        .route(
            "/api/users/:id",
            get(users::users_show)
                .put(users::users_update)
                .delete(users::users_delete),
        )
}

/// Serve `app` until SIGINT/SIGTERM, then give in-flight requests up to the
/// configured grace period before returning.
pub async fn serve(listener: TcpListener, app: Router, config: &ServerConfig) -> std::io::Result<()> {
    serve_until(listener, app, config, shutdown_signal()).await
}

/// Like `serve`, with the shutdown trigger supplied by the caller.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    config: &ServerConfig,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    info!("Server listening on http://{}", listener.local_addr()?);

    let stop = Arc::new(Notify::new());
    let stop_rx = stop.clone();
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop_rx.notified().await })
            .into_future(),
    );

    tokio::select! {
        // The server only stops on its own when it fails
        result = &mut server => {
            return result.map_err(std::io::Error::other)?;
        }
        _ = shutdown => {
            info!("Server is shutting down...");
        }
    }

    // notify_one stores a permit, so this is not lost if the server task
    // has not polled its shutdown future yet
    stop.notify_one();

    let grace = config.shutdown_timeout();
    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            result.map_err(std::io::Error::other)??;
            info!("Server exited");
        }
        Err(_) => {
            warn!(grace_secs = grace.as_secs(), "Shutdown grace period elapsed, dropping open connections");
            server.abort();
        }
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }
}
