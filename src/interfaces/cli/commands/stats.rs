//! Statistics commands

use chrono::Utc;
use colored::Colorize;

use crate::analytics::LinkStatus;
use crate::interfaces::cli::CliError;
use crate::services::LinkService;
use crate::storage::DIRECT_SOURCE;

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::CommandError(format!("Failed to serialize output: {}", e)))
}

pub async fn show_stats(service: &LinkService, json: bool) -> Result<(), CliError> {
    let summary = service.summary().await;

    if json {
        println!("{}", to_json(&summary)?);
        return Ok(());
    }

    println!("{}", "Link statistics:".bold().green());
    println!("  {:<16}{}", "Total links", summary.total_links.to_string().cyan());
    println!("  {:<16}{}", "Total clicks", summary.total_clicks.to_string().cyan());
    println!("  {:<16}{}", "Active links", summary.active_links.to_string().green());
    println!("  {:<16}{}", "Expired links", summary.expired_links.to_string().red());
    Ok(())
}

pub async fn show_link(service: &LinkService, short_code: &str, json: bool) -> Result<(), CliError> {
    let view = service.detail(short_code).await?;

    if json {
        println!("{}", to_json(&view)?);
        return Ok(());
    }

    let link = &view.record;
    let status = match LinkStatus::of(link, Utc::now()) {
        LinkStatus::Active => "Active".green(),
        LinkStatus::Expired => "Expired".red(),
    };

    println!("{} [{}]", service.short_url(link).cyan().bold(), status);
    println!("  {:<10}{}", "Target", link.original_url.blue().underline());
    println!("  {:<10}{}", "Id", link.id.dimmed());
    println!(
        "  {:<10}{}",
        "Created",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  {:<10}{}",
        "Expires",
        link.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  {:<10}{}", "Clicks", link.clicks().to_string().green());

    if view.recent_clicks.is_empty() {
        println!();
        println!("{} No clicks recorded yet", "ℹ".bold().blue());
        return Ok(());
    }

    println!();
    println!("{}", "By source:".bold());
    for (source, count) in &view.clicks_by_source {
        println!("  {:<32}{}", source, count);
    }
    println!("{}", "By location:".bold());
    for (location, count) in &view.clicks_by_location {
        println!("  {:<32}{}", location, count);
    }

    println!();
    println!(
        "{}",
        format!("Detailed click data ({} clicks):", view.recent_clicks.len()).bold()
    );
    for click in &view.recent_clicks {
        let source = if click.referrer_source == DIRECT_SOURCE {
            "Direct Access"
        } else {
            click.referrer_source.as_str()
        };
        println!(
            "  {}  {}  {}",
            click.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            source,
            click.approximate_location.yellow()
        );
    }
    Ok(())
}
