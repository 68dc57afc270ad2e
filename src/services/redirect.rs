//! Redirect resolution
//!
//! Turns an inbound short code into a navigation decision. Only an active
//! link produces a click; expired and unknown codes leave the store alone.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use super::LinkService;
use crate::errors::LinkstashError;
use crate::storage::{ClickEvent, LinkRecord};
use crate::utils::url_validator::referrer_origin;

#[derive(Debug, Clone, PartialEq)]
pub enum RedirectOutcome {
    /// The caller should navigate to `target`; `record` includes the new click.
    Redirect { target: String, record: LinkRecord },
    Expired { record: LinkRecord },
    NotFound,
}

impl RedirectOutcome {
    pub fn target(&self) -> Option<&str> {
        match self {
            RedirectOutcome::Redirect { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// What is known about the visitor.
#[derive(Debug, Clone, Default)]
pub struct Visit<'a> {
    pub referrer: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub client_ip: Option<&'a str>,
}

impl LinkService {
    pub async fn resolve(&self, code: &str, visit: Visit<'_>) -> RedirectOutcome {
        self.resolve_at(code, visit, Utc::now()).await
    }

    #[instrument(skip(self, visit), fields(code = %code))]
    pub async fn resolve_at(
        &self,
        code: &str,
        visit: Visit<'_>,
        now: DateTime<Utc>,
    ) -> RedirectOutcome {
        let mut store = self.store.lock().await;

        let Some(record) = store.find_by_code(code).cloned() else {
            debug!("Redirect link not found: {}", code);
            self.activity
                .warn(
                    "Short code not found",
                    Some(serde_json::json!({ "shortCode": code })),
                )
                .await;
            return RedirectOutcome::NotFound;
        };

        let location = self.locator.locate(visit.client_ip).await;
        let event = ClickEvent::new(now, referrer_origin(visit.referrer), location)
            .with_user_agent(visit.user_agent.map(str::to_string));

        match self.record_locked(&mut store, &record.id, event).await {
            Ok(updated) => RedirectOutcome::Redirect {
                target: updated.original_url.clone(),
                record: updated,
            },
            Err(LinkstashError::Expired(_)) => RedirectOutcome::Expired { record },
            Err(e) => {
                // found under this same lock; treat anything else as a miss
                debug!("Redirect of '{}' failed: {}", code, e);
                RedirectOutcome::NotFound
            }
        }
    }
}
