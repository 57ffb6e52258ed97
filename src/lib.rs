pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod shutdown;
pub mod sparql;

pub use client::{DbpediaClient, QueryError, SparqlClient};
pub use config::{CliArgs, RunMode, ServerConfig};
pub use error::{ApiError, ErrorCode, ErrorResponse};
pub use handlers::AppState;
pub use logging::{LoggingConfig, init_logging};
pub use server::{Server, build_router};

use anyhow::{Context, Result};
use sparql::QueryValidator;
use std::sync::Arc;

/// Wires the upstream client, validator and router together and serves until
/// a shutdown signal arrives.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let client = DbpediaClient::new(config.endpoint.clone())
        .context("failed to initialise SPARQL client")?;
    let state = AppState::new(Arc::new(client), QueryValidator::new(config.syntax_check));

    tracing::info!(
        endpoint = %config.endpoint,
        syntax_check = %config.syntax_check,
        mode = %config.mode,
        "starting DBpedia SPARQL proxy",
    );

    Server::new(state, &config).run().await
}
