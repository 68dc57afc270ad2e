//! Add link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{CreateLinkRequest, LinkService};

pub async fn add_link(
    service: &LinkService,
    url: String,
    validity_minutes: i64,
    code: Option<String>,
) -> Result<(), CliError> {
    let generated = code.as_deref().is_none_or(str::is_empty);
    let request = CreateLinkRequest {
        original_url: url,
        validity_minutes,
        custom_code: code,
    };

    let link = service.create_link(request).await?;

    if generated {
        println!(
            "{} Generated random code: {}",
            "ℹ".bold().blue(),
            link.short_code.magenta()
        );
    }

    println!(
        "{} Added short link: {} -> {} (expires: {})",
        "✓".bold().green(),
        service.short_url(&link).cyan(),
        link.original_url.blue().underline(),
        link.expires_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .yellow()
    );
    println!("  {} {}", "id:".dimmed(), link.id.dimmed());

    Ok(())
}
