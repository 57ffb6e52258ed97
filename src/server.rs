use crate::config::{RunMode, ServerConfig};
use crate::handlers::{AppState, execute_query, list_examples, validate_query};
use crate::health::liveness_handler;
use crate::middleware::{cors, request_timing};
use crate::shutdown::shutdown_signal;
use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Method and path of every registered route, legacy aliases last.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/health"),
    ("POST", "/api/v1/sparql"),
    ("POST", "/api/v1/validate"),
    ("GET", "/api/v1/examples"),
    ("POST", "/sparql"),
    ("GET", "/examples"),
];

/// Builds the application router with CORS and request logging applied.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/sparql", post(execute_query))
        .route("/validate", post(validate_query))
        .route("/examples", get(list_examples));

    Router::new()
        .route("/health", get(liveness_handler))
        .nest("/api/v1", api)
        // Legacy aliases.
        .route("/sparql", post(execute_query))
        .route("/examples", get(list_examples))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors))
        .layer(axum::middleware::from_fn(request_timing))
}

pub struct Server {
    router: Router,
    listen_address: SocketAddr,
    mode: RunMode,
}

impl Server {
    pub fn new(state: AppState, config: &ServerConfig) -> Self {
        Self {
            router: build_router(state),
            listen_address: config.listen_address,
            mode: config.mode,
        }
    }

    /// Binds the listener and serves until SIGINT/SIGTERM.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.listen_address)
            .await
            .with_context(|| format!("failed to bind {}", self.listen_address))?;
        self.serve(listener, shutdown_signal()).await?;
        tracing::info!("server stopped");
        Ok(())
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let bound = listener.local_addr()?;
        tracing::info!(bind = %bound, mode = %self.mode, "listening");
        for (method, path) in ROUTES {
            if self.mode.is_debug() {
                tracing::info!(%method, %path, "route registered");
            } else {
                tracing::debug!(%method, %path, "route registered");
            }
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("server error")
    }
}
