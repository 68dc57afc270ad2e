use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::is_expired;
use crate::storage::{ClickEvent, LinkRecord};

/// Collection-wide counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_links: usize,
    pub total_clicks: u64,
    pub active_links: usize,
    pub expired_links: usize,
}

/// Read-only projection of one link for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailView {
    pub record: LinkRecord,
    /// Most recent click first.
    pub recent_clicks: Vec<ClickEvent>,
    pub clicks_by_source: BTreeMap<String, usize>,
    pub clicks_by_location: BTreeMap<String, usize>,
}

pub fn summarize(records: &[LinkRecord], now: DateTime<Utc>) -> Summary {
    let total_links = records.len();
    let total_clicks = records.iter().map(LinkRecord::clicks).sum();
    let active_links = records.iter().filter(|r| !is_expired(r, now)).count();

    Summary {
        total_links,
        total_clicks,
        active_links,
        expired_links: total_links - active_links,
    }
}

pub fn detail(record: &LinkRecord) -> DetailView {
    let history = record.click_history();

    let mut clicks_by_source = BTreeMap::new();
    let mut clicks_by_location = BTreeMap::new();
    for click in history {
        *clicks_by_source
            .entry(click.referrer_source.clone())
            .or_insert(0) += 1;
        *clicks_by_location
            .entry(click.approximate_location.clone())
            .or_insert(0) += 1;
    }

    DetailView {
        record: record.clone(),
        recent_clicks: history.iter().rev().cloned().collect(),
        clicks_by_source,
        clicks_by_location,
    }
}
