use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use client::ZkLeaderResolver;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::Action;
use commands::Context;
use config::Config;
use output::Output;

mod cli;
mod commands;
mod config;
mod output;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = cli::Cli::parse();

    // Initialize tracing on stderr so stdout only carries results
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.global.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config =
        Config::load(&cli.global).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    let leader = Arc::new(ZkLeaderResolver::new(Duration::from_secs(
        config.zookeeper.timeout,
    )));

    let mut ctx = Context {
        config,
        leader,
        http: reqwest::Client::new(),
        out: Output::stdout(cli.global.json),
    };

    match &cli.action {
        Action::Fetch(fetch) => commands::dispatch(&mut ctx, fetch).await.map_err(|e| {
            error!("{}", e);
            anyhow::anyhow!("Fetch failed: {}", e)
        })?,
    }

    Ok(())
}
