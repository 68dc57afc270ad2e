//! Click analytics
//!
//! Pure views over link records: expiry classification, collection-wide
//! summaries and per-link click breakdowns, plus the pluggable location
//! capability used when recording clicks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::storage::LinkRecord;

pub mod location;
pub mod stats;

pub use location::{LocationLookup, LocationProvider, MockLocationPool, UnknownLocation};
pub use stats::{DetailView, Summary, detail, summarize};

/// A link is active up to and including its expiry instant.
pub fn is_expired(record: &LinkRecord, now: DateTime<Utc>) -> bool {
    now > record.expires_at
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
pub enum LinkStatus {
    Active,
    Expired,
}

impl LinkStatus {
    pub fn of(record: &LinkRecord, now: DateTime<Utc>) -> Self {
        if is_expired(record, now) {
            LinkStatus::Expired
        } else {
            LinkStatus::Active
        }
    }
}
