//! HTTP front door for kubeglance
//!
//! Serves the cluster snapshot and host metrics as JSON:
//! - `/api/k8sinfo` - node list, pod list and pods grouped by node
//! - `/api/metrics/cpu` - aggregate CPU usage
//! - `/api/metrics/memory` - memory usage
//! - `/api/metrics/disk` - root filesystem usage
//! - `/health` - liveness check
//!
//! Every response carries permissive CORS headers and any `OPTIONS` request
//! is answered with a bare 200.

mod cors;
mod error;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;
use tracing::info;

use kubeglance_k8s::SnapshotSource;
use kubeglance_metrics::HostMetrics;

pub use cors::cors;
pub use error::ApiError;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host address to bind to.
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the port number.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Address in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Backends shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    cluster: Arc<dyn SnapshotSource>,
    host: Arc<dyn HostMetrics>,
}

impl AppState {
    pub fn new(cluster: impl SnapshotSource + 'static, host: impl HostMetrics + 'static) -> Self {
        Self {
            cluster: Arc::new(cluster),
            host: Arc::new(host),
        }
    }
}

/// Build the router with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/k8sinfo", get(routes::cluster_info))
        .route("/api/metrics/cpu", get(routes::cpu))
        .route("/api/metrics/memory", get(routes::memory))
        .route("/api/metrics/disk", get(routes::disk))
        .route("/health", get(routes::health))
        .fallback(routes::not_found)
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The kubeglance HTTP server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Returns the address the server will listen on.
    pub fn addr(&self) -> String {
        self.config.addr()
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.config.addr()).await?;
        info!(addr = %listener.local_addr()?, "kubeglance listening");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
