//! Remove link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

/// Deletes by id, falling back to a short-code lookup.
pub async fn remove_link(service: &LinkService, target: &str) -> Result<(), CliError> {
    let id = match service.find_by_id(target).await {
        Some(link) => link.id,
        None => match service.find_by_code(target).await {
            Some(link) => link.id,
            None => target.to_string(),
        },
    };

    if service.delete_link(&id).await {
        println!("{} Deleted short link: {}", "✓".bold().green(), target.cyan());
    } else {
        println!(
            "{} Nothing to delete for: {}",
            "ℹ".bold().blue(),
            target.cyan()
        );
    }
    Ok(())
}
