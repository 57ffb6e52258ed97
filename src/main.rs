use clap::Parser;
use dbpedia_sparql_proxy::{CliArgs, LoggingConfig, ServerConfig, init_logging, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();
    let config = ServerConfig::from_args(cli)?;

    let _guard = init_logging(LoggingConfig::from_env(config.mode))?;

    // Validate configuration before server startup (fail-fast)
    config.validate()?;

    run_server(config).await
}
