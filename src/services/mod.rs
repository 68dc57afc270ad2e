pub mod activity_log;
pub mod link_service;
pub mod redirect;

pub use activity_log::{ActivityLog, LogEntry, LogLevel};
pub use link_service::{CreateLinkRequest, LinkService, MAX_GENERATE_ATTEMPTS};
pub use redirect::{RedirectOutcome, Visit};
