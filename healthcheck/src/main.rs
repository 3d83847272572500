//! healthcheck-server entrypoint

use clap::Parser;
use healthcheck::cli::Cli;
use healthcheck::config::HealthConfig;
use healthcheck::error::HealthResult;
use healthcheck::logging::{self, LogConfig};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_guard = logging::init(&LogConfig::from_env())?;

    if let Err(err) = start(&cli).await {
        tracing::error!("❌ Failed to start server: {}", err);
        drop(log_guard);
        std::process::exit(1);
    }

    Ok(())
}

async fn start(cli: &Cli) -> HealthResult<()> {
    let config = cli.apply(HealthConfig::from_env()?);
    config.validate()?;
    healthcheck::server::run(config, CancellationToken::new()).await
}
