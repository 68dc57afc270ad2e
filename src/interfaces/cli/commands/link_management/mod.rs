//! Link management commands
//!
//! This module provides CLI commands for managing short links.

mod add;
mod list;
mod open;
mod remove;

pub use add::add_link;
pub use list::list_links;
pub use open::open_link;
pub use remove::remove_link;
