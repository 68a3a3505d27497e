mod cli;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use duckbug_client::config::{config_schema, load_config};
use duckbug_client::startup;
use duckbug_client::utils::logger::init_logging;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ConfigSchema = cli.command {
        println!("{}", config_schema());
        return Ok(());
    }

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    init_logging(&config.logging).map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;

    let state = startup::build(Arc::new(config))
        .await
        .context("Failed to start client")?;
    cli::run(cli.command, &state).await
}
