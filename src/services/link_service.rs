//! Link management service
//!
//! Owns the link collection and is the only way to mutate it. Every
//! mutating operation runs under one lock, so short-code uniqueness and the
//! click counter hold with concurrent callers too.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::activity_log::ActivityLog;
use crate::analytics::{self, DetailView, LocationProvider, Summary, is_expired};
use crate::config::StaticConfig;
use crate::errors::{LinkstashError, Result};
use crate::storage::{BlobStore, ClickEvent, LinkRecord, LinkStore};
use crate::utils::url_validator::validate_url;
use crate::utils::{CodeGenerator, RandomCodeGenerator, is_valid_short_code};

/// Attempts at finding an unused generated code before giving up.
pub const MAX_GENERATE_ATTEMPTS: usize = 64;

// ============ Request DTOs ============

/// Request to create a new link
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    pub original_url: String,
    pub validity_minutes: i64,
    /// Custom short code; `None` or empty means generate one
    pub custom_code: Option<String>,
}

impl CreateLinkRequest {
    pub fn new(original_url: impl Into<String>, validity_minutes: i64) -> Self {
        Self {
            original_url: original_url.into(),
            validity_minutes,
            custom_code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.custom_code = Some(code.into());
        self
    }

    fn custom_code(&self) -> Option<&str> {
        self.custom_code.as_deref().filter(|c| !c.is_empty())
    }
}

// ============ LinkService Implementation ============

pub struct LinkService {
    pub(super) store: Mutex<LinkStore>,
    pub(super) generator: Box<dyn CodeGenerator>,
    pub(super) locator: LocationProvider,
    pub(super) activity: Arc<ActivityLog>,
    base_url: String,
    create_delay: StdDuration,
}

impl LinkService {
    /// Cold start against `blob`: loads links and the activity log.
    pub async fn open(blob: Arc<dyn BlobStore>, config: &StaticConfig) -> Result<Self> {
        let store = LinkStore::load(blob.clone(), config.storage.links_key.clone()).await?;
        let activity =
            ActivityLog::load(blob, config.storage.logs_key.clone(), &config.activity).await;
        activity
            .info(
                "Loaded URLs from storage",
                Some(json!({ "count": store.len() })),
            )
            .await;

        Ok(Self {
            store: Mutex::new(store),
            generator: Box::new(RandomCodeGenerator::new(config.links.code_length)),
            locator: LocationProvider::new(&config.analytics),
            activity: Arc::new(activity),
            base_url: config.links.base_url.clone(),
            create_delay: StdDuration::from_millis(config.links.create_delay_ms),
        })
    }

    pub fn with_generator(mut self, generator: Box<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_locator(mut self, locator: LocationProvider) -> Self {
        self.locator = locator;
        self
    }

    pub fn activity(&self) -> &Arc<ActivityLog> {
        &self.activity
    }

    pub fn short_url(&self, record: &LinkRecord) -> String {
        record.short_url(&self.base_url)
    }

    // ============ Create ============

    /// Validates and stores a new link created now.
    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<LinkRecord> {
        self.create(req, None).await
    }

    /// Same as [`create_link`](Self::create_link) with an explicit creation instant.
    pub async fn create_link_at(
        &self,
        req: CreateLinkRequest,
        now: DateTime<Utc>,
    ) -> Result<LinkRecord> {
        self.create(req, Some(now)).await
    }

    async fn create(
        &self,
        req: CreateLinkRequest,
        at: Option<DateTime<Utc>>,
    ) -> Result<LinkRecord> {
        self.activity
            .info(
                "Link creation started",
                Some(json!({
                    "originalUrl": req.original_url,
                    "validityMinutes": req.validity_minutes,
                    "customCode": req.custom_code,
                })),
            )
            .await;

        let mut store = self.store.lock().await;

        let validity = match Self::validate(&store, &req) {
            Ok(validity) => validity,
            Err(e) => {
                self.activity
                    .warn(
                        format!("Validation failed: {}", e.error_type()),
                        Some(json!({
                            "originalUrl": req.original_url,
                            "validityMinutes": req.validity_minutes,
                            "customCode": req.custom_code,
                            "reason": e.message(),
                        })),
                    )
                    .await;
                return Err(e);
            }
        };

        // the store stays locked, so nothing can claim the code meanwhile
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }

        let (code, generated) = match req.custom_code() {
            Some(code) => (code.to_string(), false),
            None => (self.generate_unique_code(&store)?, true),
        };

        let created_at = at.unwrap_or_else(Utc::now);
        let expires_at = created_at.checked_add_signed(validity).ok_or_else(|| {
            LinkstashError::link_invalid_validity(format!(
                "Validity of {} minutes is out of range",
                req.validity_minutes
            ))
        })?;

        let record = LinkRecord::new(
            Uuid::new_v4().to_string(),
            req.original_url.trim(),
            code,
            created_at,
            expires_at,
        );
        store.insert(record.clone()).await?;
        drop(store);

        info!(
            "LinkService: created '{}' -> '{}' (expires {})",
            record.short_code, record.original_url, record.expires_at
        );
        self.activity
            .info(
                "URL shortened successfully",
                Some(json!({
                    "shortCode": record.short_code,
                    "originalUrl": record.original_url,
                    "validityMinutes": req.validity_minutes,
                    "expiresAt": crate::storage::timestamp::format(&record.expires_at),
                    "generatedCode": generated,
                })),
            )
            .await;

        Ok(record)
    }

    /// Checks a create request in order, first failure wins:
    /// URL, validity, custom code uniqueness, custom code format.
    fn validate(store: &LinkStore, req: &CreateLinkRequest) -> Result<Duration> {
        validate_url(&req.original_url)
            .map_err(|e| LinkstashError::link_invalid_url(e.to_string()))?;

        if req.validity_minutes <= 0 {
            return Err(LinkstashError::link_invalid_validity(format!(
                "Validity must be greater than 0 minutes, got {}",
                req.validity_minutes
            )));
        }
        let validity = Duration::try_minutes(req.validity_minutes).ok_or_else(|| {
            LinkstashError::link_invalid_validity(format!(
                "Validity of {} minutes is out of range",
                req.validity_minutes
            ))
        })?;

        if let Some(code) = req.custom_code() {
            if !store.is_code_unique(code) {
                return Err(LinkstashError::link_code_taken(format!(
                    "Short code '{}' already exists",
                    code
                )));
            }
            if !is_valid_short_code(code) {
                return Err(LinkstashError::link_invalid_code(format!(
                    "Short code '{}' must contain only letters and numbers",
                    code
                )));
            }
        }

        Ok(validity)
    }

    fn generate_unique_code(&self, store: &LinkStore) -> Result<String> {
        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let code = self.generator.generate();
            if is_valid_short_code(&code) && store.is_code_unique(&code) {
                debug!("Generated short code '{}' after {} attempt(s)", code, attempt);
                return Ok(code);
            }
            debug!("Generated short code '{}' rejected, retrying", code);
        }
        Err(LinkstashError::code_generation(format!(
            "No unused short code found after {} attempts",
            MAX_GENERATE_ATTEMPTS
        )))
    }

    // ============ Delete / Lookup ============

    /// Removes the link with `id`. Missing ids are a no-op.
    ///
    /// Returns whether a link was removed.
    pub async fn delete_link(&self, id: &str) -> bool {
        let removed = self.store.lock().await.remove(id).await;
        match removed {
            Some(record) => {
                info!("LinkService: deleted '{}'", record.short_code);
                self.activity
                    .info(
                        "URL deleted",
                        Some(json!({ "id": record.id, "shortCode": record.short_code })),
                    )
                    .await;
                true
            }
            None => {
                debug!("LinkService: delete of unknown id '{}' ignored", id);
                false
            }
        }
    }

    pub async fn find_by_code(&self, code: &str) -> Option<LinkRecord> {
        self.store.lock().await.find_by_code(code).cloned()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<LinkRecord> {
        self.store.lock().await.find_by_id(id).cloned()
    }

    /// All links in insertion order.
    pub async fn get_all(&self) -> Vec<LinkRecord> {
        self.store.lock().await.records().to_vec()
    }

    /// All links, newest first.
    pub async fn list_links(&self) -> Vec<LinkRecord> {
        let mut links = self.get_all().await;
        links.reverse();
        links
    }

    // ============ Click Recording ============

    pub async fn record_click(
        &self,
        link_id: &str,
        source: &str,
        location: &str,
    ) -> Result<LinkRecord> {
        self.record_click_at(link_id, source, location, Utc::now())
            .await
    }

    /// Appends a click to the link with `link_id`.
    ///
    /// Expired links are rejected untouched; they stop collecting clicks.
    pub async fn record_click_at(
        &self,
        link_id: &str,
        source: &str,
        location: &str,
        now: DateTime<Utc>,
    ) -> Result<LinkRecord> {
        let mut store = self.store.lock().await;
        self.record_locked(&mut store, link_id, ClickEvent::new(now, source, location))
            .await
    }

    pub(super) async fn record_locked(
        &self,
        store: &mut LinkStore,
        link_id: &str,
        event: ClickEvent,
    ) -> Result<LinkRecord> {
        let record = store
            .find_by_id(link_id)
            .ok_or_else(|| LinkstashError::not_found(format!("Link '{}' not found", link_id)))?;

        if is_expired(record, event.timestamp) {
            let code = record.short_code.clone();
            self.activity
                .warn(
                    "Attempted to access expired URL",
                    Some(json!({ "shortCode": code })),
                )
                .await;
            return Err(LinkstashError::expired(format!(
                "Link '{}' expired at {}",
                code, record.expires_at
            )));
        }

        let click = event.clone();
        let updated = store
            .push_click(link_id, event)
            .await
            .ok_or_else(|| LinkstashError::not_found(format!("Link '{}' not found", link_id)))?;

        debug!(
            "LinkService: click on '{}' from {} ({})",
            updated.short_code, click.referrer_source, click.approximate_location
        );
        self.activity
            .info(
                "URL clicked",
                Some(json!({
                    "shortCode": updated.short_code,
                    "clickData": click,
                    "totalClicks": updated.clicks(),
                })),
            )
            .await;

        Ok(updated)
    }

    // ============ Statistics ============

    pub async fn summary(&self) -> Summary {
        self.summary_at(Utc::now()).await
    }

    pub async fn summary_at(&self, now: DateTime<Utc>) -> Summary {
        analytics::summarize(self.store.lock().await.records(), now)
    }

    /// Detail view of the link with short code `code`.
    pub async fn detail(&self, code: &str) -> Result<DetailView> {
        self.store
            .lock()
            .await
            .find_by_code(code)
            .map(analytics::detail)
            .ok_or_else(|| LinkstashError::not_found(format!("Short code '{}' not found", code)))
    }

    // ============ Persistence ============

    pub async fn is_dirty(&self) -> bool {
        self.store.lock().await.is_dirty()
    }

    /// Re-attempts writing the full collection.
    pub async fn flush(&self) -> Result<()> {
        self.store.lock().await.flush().await
    }
}
