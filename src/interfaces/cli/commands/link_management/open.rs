//! Open (simulated redirect) command

use colored::Colorize;

use crate::errors::LinkstashError;
use crate::interfaces::cli::CliError;
use crate::services::{LinkService, RedirectOutcome, Visit};

pub async fn open_link(
    service: &LinkService,
    short_code: &str,
    referrer: Option<String>,
    user_agent: Option<String>,
) -> Result<(), CliError> {
    let visit = Visit {
        referrer: referrer.as_deref(),
        user_agent: user_agent.as_deref(),
        client_ip: None,
    };

    match service.resolve(short_code, visit).await {
        RedirectOutcome::Redirect { target, record } => {
            println!(
                "{} {} -> {}",
                "→".bold().green(),
                short_code.cyan(),
                target.blue().underline()
            );
            println!(
                "  {} {}",
                "total clicks:".dimmed(),
                record.clicks().to_string().green()
            );
            Ok(())
        }
        RedirectOutcome::Expired { record } => Err(LinkstashError::expired(format!(
            "This shortened URL expired at {}",
            record.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
        ))
        .into()),
        RedirectOutcome::NotFound => Err(LinkstashError::not_found(format!(
            "The short code '{}' does not exist",
            short_code
        ))
        .into()),
    }
}
