use anyhow::{Context, Result};
use clap::Parser;

use linkstash::cli::Cli;
use linkstash::config::{get_config, init_config};
use linkstash::interfaces::cli::run_cli_command;
use linkstash::system::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_config(cli.config.as_deref());
    let config = get_config();

    // Keep the guard alive so buffered log lines are flushed on exit
    let guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::debug!(
        backend = %config.storage.backend,
        data_dir = %config.storage.data_dir,
        "linkstash starting"
    );

    if let Err(e) = run_cli_command(cli.command, &config).await {
        eprintln!("{}", e.format_colored());
        drop(guard);
        std::process::exit(1);
    }

    Ok(())
}
