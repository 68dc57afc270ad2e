//! CLI interface module
//!
//! Maps parsed commands onto `LinkService` calls and prints the results.

pub mod commands;

use std::fmt;

use tokio::sync::OnceCell;

use crate::cli::{Commands, ConfigCommands, LogCommands};
use crate::config::StaticConfig;
use crate::errors::LinkstashError;
use crate::services::LinkService;
use crate::storage::StorageFactory;
use commands::{
    add_link, clear_logs, export_logs, generate_config, list_links, list_logs, open_link,
    remove_link, show_link, show_stats,
};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
    Service(LinkstashError),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
            CliError::Service(err) => err.format_simple(),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
            CliError::Service(err) => err.format_colored(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<LinkstashError> for CliError {
    fn from(err: LinkstashError) -> Self {
        CliError::Service(err)
    }
}

/// Opens storage and the link service on first use.
async fn service<'a>(
    cell: &'a OnceCell<LinkService>,
    config: &StaticConfig,
) -> Result<&'a LinkService, CliError> {
    cell.get_or_try_init(|| async {
        let blob = StorageFactory::create(&config.storage)
            .map_err(|e| CliError::StorageError(e.to_string()))?;
        LinkService::open(blob, config)
            .await
            .map_err(|e| CliError::StorageError(e.to_string()))
    })
    .await
}

/// Run a CLI command from clap-parsed input
///
/// Storage is only opened by commands that need it.
pub async fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    let cell = OnceCell::new();

    let result = match cmd {
        Commands::Add { url, minutes, code } => {
            let minutes = minutes.unwrap_or(config.links.default_validity_minutes);
            add_link(service(&cell, config).await?, url, minutes, code).await
        }

        Commands::Remove { target } => remove_link(service(&cell, config).await?, &target).await,

        Commands::List => list_links(service(&cell, config).await?).await,

        Commands::Open {
            short_code,
            referrer,
            user_agent,
        } => {
            open_link(
                service(&cell, config).await?,
                &short_code,
                referrer,
                user_agent,
            )
            .await
        }

        Commands::Stats { json } => show_stats(service(&cell, config).await?, json).await,

        Commands::Show { short_code, json } => {
            show_link(service(&cell, config).await?, &short_code, json).await
        }

        Commands::Logs { action } => {
            let service = service(&cell, config).await?;
            match action.unwrap_or(LogCommands::List {
                level: None,
                since: None,
                until: None,
            }) {
                LogCommands::List {
                    level,
                    since,
                    until,
                } => list_logs(service, level, since, until).await,
                LogCommands::Export => export_logs(service).await,
                LogCommands::Clear => clear_logs(service).await,
            }
        }

        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => generate_config(output_path, force).await,
    };

    if let Some(service) = cell.get() {
        if service.is_dirty().await {
            service.flush().await.map_err(|e| {
                CliError::StorageError(format!("Links could not be saved: {}", e))
            })?;
        }
    }

    result
}
