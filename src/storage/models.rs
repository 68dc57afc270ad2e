use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::timestamp;

/// Referrer sentinel for visits without a referring origin.
pub const DIRECT_SOURCE: &str = "direct";

/// Location reported when no provider can say anything better.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// One recorded visit to a short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "source", default = "default_source")]
    pub referrer_source: String,
    #[serde(alias = "location", default = "default_location")]
    pub approximate_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ClickEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        referrer_source: impl Into<String>,
        approximate_location: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            referrer_source: referrer_source.into(),
            approximate_location: approximate_location.into(),
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent.filter(|ua| !ua.trim().is_empty());
        self
    }

    pub fn is_direct(&self) -> bool {
        self.referrer_source == DIRECT_SOURCE
    }
}

fn default_source() -> String {
    DIRECT_SOURCE.to_string()
}

fn default_location() -> String {
    UNKNOWN_LOCATION.to_string()
}

/// A short link and its click history.
///
/// Everything except the click counter and history is fixed at creation.
/// The counter and history are only reachable through [`LinkRecord::push_click`],
/// which keeps `clicks() == click_history().len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub original_url: String,
    #[serde(alias = "shortcode")]
    pub short_code: String,
    #[serde(with = "timestamp", alias = "createdDate")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp", alias = "expiryDate")]
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    clicks: u64,
    #[serde(default, alias = "clickData")]
    click_history: Vec<ClickEvent>,
}

impl LinkRecord {
    /// Builds a record with an empty click history.
    ///
    /// No validation happens here; `LinkService::create_link` is the
    /// validated path.
    pub fn new(
        id: impl Into<String>,
        original_url: impl Into<String>,
        short_code: impl Into<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            original_url: original_url.into(),
            short_code: short_code.into(),
            created_at,
            expires_at,
            clicks: 0,
            click_history: Vec::new(),
        }
    }

    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    /// Click events in chronological order.
    pub fn click_history(&self) -> &[ClickEvent] {
        &self.click_history
    }

    pub fn last_click(&self) -> Option<&ClickEvent> {
        self.click_history.last()
    }

    /// Appends a click and bumps the counter in one step.
    pub fn push_click(&mut self, event: ClickEvent) {
        self.click_history.push(event);
        self.clicks += 1;
    }

    pub fn validity(&self) -> Duration {
        self.expires_at - self.created_at
    }

    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.short_code)
    }

    /// Realigns the counter with the history after loading foreign data.
    ///
    /// Returns `true` when the stored counter was wrong.
    pub(crate) fn repair_click_counter(&mut self) -> bool {
        let actual = self.click_history.len() as u64;
        if self.clicks == actual {
            return false;
        }
        self.clicks = actual;
        true
    }
}

/// Accepts string ids as well as the numeric ids older blobs carry.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
