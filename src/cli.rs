//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// linkstash - expiring short links with click statistics
#[derive(Parser)]
#[command(name = "linkstash")]
#[command(version)]
#[command(about = "Expiring short links with click statistics", long_about = None)]
pub struct Cli {
    /// Configuration file (default: linkstash.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Shorten a URL
    Add {
        /// Destination URL
        url: String,

        /// Validity in minutes (default from config, 30)
        #[arg(long, short = 'm', allow_negative_numbers = true)]
        minutes: Option<i64>,

        /// Custom short code (letters and numbers only)
        #[arg(long)]
        code: Option<String>,
    },

    /// Delete a link by id or short code
    Remove {
        /// Link id or short code
        target: String,
    },

    /// List all links, newest first
    List,

    /// Follow a short code the way a visitor would and record the click
    Open {
        short_code: String,

        /// Referring page URL
        #[arg(long)]
        referrer: Option<String>,

        /// Visitor user agent
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Show collection-wide statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one link with its click history
    Show {
        short_code: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect the activity log
    Logs {
        #[command(subcommand)]
        action: Option<LogCommands>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Activity log commands
#[derive(Subcommand)]
pub enum LogCommands {
    /// Print entries, optionally filtered
    List {
        /// Only entries of this level (DEBUG, INFO, WARN, ERROR)
        #[arg(long)]
        level: Option<String>,

        /// Only entries at or after this RFC 3339 instant
        #[arg(long)]
        since: Option<String>,

        /// Only entries at or before this RFC 3339 instant
        #[arg(long)]
        until: Option<String>,
    },

    /// Print all entries as pretty JSON
    Export,

    /// Delete all entries
    Clear,
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: linkstash.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
