//! Activity log commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{LinkService, LogLevel};
use crate::storage::timestamp;

pub async fn list_logs(
    service: &LinkService,
    level: Option<String>,
    since: Option<String>,
    until: Option<String>,
) -> Result<(), CliError> {
    let level = level
        .map(|l| {
            l.parse::<LogLevel>().map_err(|_| {
                CliError::ParseError(format!(
                    "Invalid level '{}'. Valid: DEBUG, INFO, WARN, ERROR",
                    l
                ))
            })
        })
        .transpose()?;
    let since = since
        .map(|s| timestamp::parse(&s))
        .transpose()
        .map_err(|e| CliError::ParseError(format!("--since: {}", e)))?;
    let until = until
        .map(|s| timestamp::parse(&s))
        .transpose()
        .map_err(|e| CliError::ParseError(format!("--until: {}", e)))?;

    let log = service.activity();
    let mut entries = match (since, until) {
        (None, None) => log.entries().await,
        (since, until) => {
            log.by_time_range(
                since.unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC),
                until.unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC),
            )
            .await
        }
    };
    if let Some(level) = level {
        entries.retain(|e| e.level == level);
    }

    if entries.is_empty() {
        println!("{} No log entries", "ℹ".bold().blue());
        return Ok(());
    }

    for entry in &entries {
        let level = match entry.level {
            LogLevel::Debug => entry.level.as_ref().dimmed(),
            LogLevel::Info => entry.level.as_ref().blue(),
            LogLevel::Warn => entry.level.as_ref().yellow(),
            LogLevel::Error => entry.level.as_ref().red(),
        };
        let data = entry
            .data
            .as_ref()
            .map(|d| format!(" {}", d).dimmed().to_string())
            .unwrap_or_default();
        println!(
            "[{:>5}] {} - {}{}",
            level,
            timestamp::format(&entry.timestamp).dimmed(),
            entry.message,
            data
        );
    }
    Ok(())
}

pub async fn export_logs(service: &LinkService) -> Result<(), CliError> {
    println!("{}", service.activity().export_json().await?);
    Ok(())
}

pub async fn clear_logs(service: &LinkService) -> Result<(), CliError> {
    service.activity().clear().await;
    println!("{} Activity log cleared", "✓".bold().green());
    Ok(())
}
