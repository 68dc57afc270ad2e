//! List links command

use chrono::Utc;
use colored::Colorize;

use crate::analytics::LinkStatus;
use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn list_links(service: &LinkService) -> Result<(), CliError> {
    let links = service.list_links().await;

    if links.is_empty() {
        println!("{} No short links found", "ℹ".bold().blue());
        return Ok(());
    }

    let now = Utc::now();
    println!("{}", "Short link list:".bold().green());
    println!();
    for link in &links {
        let status = match LinkStatus::of(link, now) {
            LinkStatus::Active => LinkStatus::Active.as_ref().green(),
            LinkStatus::Expired => LinkStatus::Expired.as_ref().red(),
        };

        let info_parts = [
            format!(
                "{} -> {}",
                link.short_code.cyan(),
                link.original_url.blue().underline()
            ),
            format!("[{}]", status),
            format!("(expires: {})", link.expires_at.format("%Y-%m-%d %H:%M:%S UTC"))
                .dimmed()
                .yellow()
                .to_string(),
            format!("(clicks: {})", link.clicks()).dimmed().cyan().to_string(),
        ];

        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} short links",
        "ℹ".bold().blue(),
        links.len().to_string().green()
    );
    Ok(())
}
