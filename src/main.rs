use anyhow::{Context, Result};
use clap::Parser;
use swapdesk::application::{Cli, CommandExecutor};
use swapdesk::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level; logs go to stderr so stdout stays JSON
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid --log-level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    info!(
        "Using quote API {} on chain {}",
        config.api.base_url, config.chain.chain_id
    );

    CommandExecutor::execute(cli.command, &config).await?;
    Ok(())
}
