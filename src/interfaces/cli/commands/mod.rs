//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod activity;
mod config_gen;
mod link_management;
mod stats;

pub use activity::{clear_logs, export_logs, list_logs};
pub use config_gen::generate_config;
pub use link_management::*;
pub use stats::{show_link, show_stats};
