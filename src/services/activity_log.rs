//! Activity log
//!
//! Application-level record of what happened to links, kept as a bounded
//! list and persisted under its own blob key. Every entry is mirrored to
//! `tracing` under the `activity` target.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::ActivityConfig;
use crate::errors::Result;
use crate::storage::{BlobStore, timestamp};
use crate::utils::generate_random_code;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

struct ActivityState {
    entries: Vec<LogEntry>,
    min_level: LogLevel,
}

pub struct ActivityLog {
    blob: Arc<dyn BlobStore>,
    key: String,
    max_entries: usize,
    state: Mutex<ActivityState>,
}

impl ActivityLog {
    /// Loads persisted entries; an unreadable log starts empty.
    pub async fn load(
        blob: Arc<dyn BlobStore>,
        key: impl Into<String>,
        config: &ActivityConfig,
    ) -> Self {
        let key = key.into();
        let min_level = config.level.parse().unwrap_or_else(|_| {
            warn!(
                "Invalid activity log level '{}', using DEBUG",
                config.level
            );
            LogLevel::Debug
        });
        let max_entries = config.max_entries.max(1);

        let mut entries = match blob.read(&key).await {
            Ok(Some(raw)) => serde_json::from_str::<Vec<LogEntry>>(&raw).unwrap_or_else(|e| {
                error!("Failed to parse activity log '{}': {}", key, e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Failed to load activity log '{}': {}", key, e);
                Vec::new()
            }
        };
        trim_front(&mut entries, max_entries);
        debug!("Activity log '{}' loaded with {} entries", key, entries.len());

        Self {
            blob,
            key,
            max_entries,
            state: Mutex::new(ActivityState { entries, min_level }),
        }
    }

    /// Appends an entry unless `level` is below the current minimum.
    pub async fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Option<LogEntry> {
        let mut state = self.state.lock().await;
        if level < state.min_level {
            return None;
        }

        let entry = LogEntry {
            id: generate_random_code(9).to_lowercase(),
            timestamp: Utc::now(),
            level,
            message: message.into(),
            data,
        };
        mirror_to_tracing(&entry);

        state.entries.push(entry.clone());
        trim_front(&mut state.entries, self.max_entries);
        self.save(&state.entries).await;
        Some(entry)
    }

    pub async fn debug(&self, message: impl Into<String>, data: Option<Value>) -> Option<LogEntry> {
        self.log(LogLevel::Debug, message, data).await
    }

    pub async fn info(&self, message: impl Into<String>, data: Option<Value>) -> Option<LogEntry> {
        self.log(LogLevel::Info, message, data).await
    }

    pub async fn warn(&self, message: impl Into<String>, data: Option<Value>) -> Option<LogEntry> {
        self.log(LogLevel::Warn, message, data).await
    }

    pub async fn error(&self, message: impl Into<String>, data: Option<Value>) -> Option<LogEntry> {
        self.log(LogLevel::Error, message, data).await
    }

    /// All entries, oldest first.
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.state.lock().await.entries.clone()
    }

    pub async fn by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.state
            .lock()
            .await
            .entries
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    /// Entries with `start <= timestamp <= end`.
    pub async fn by_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<LogEntry> {
        self.state
            .lock()
            .await
            .entries
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect()
    }

    /// Drops every entry and the persisted blob, then notes the clear.
    pub async fn clear(&self) {
        {
            let mut state = self.state.lock().await;
            state.entries.clear();
            if let Err(e) = self.blob.remove(&self.key).await {
                error!("Failed to remove activity log '{}': {}", self.key, e);
            }
        }
        self.info("Logs cleared", None).await;
    }

    pub async fn export_json(&self) -> Result<String> {
        let state = self.state.lock().await;
        Ok(serde_json::to_string_pretty(&state.entries)?)
    }

    pub async fn level(&self) -> LogLevel {
        self.state.lock().await.min_level
    }

    pub async fn set_level(&self, level: LogLevel) {
        self.state.lock().await.min_level = level;
        self.info(
            "Log level changed",
            Some(serde_json::json!({ "newLevel": level })),
        )
        .await;
    }

    async fn save(&self, entries: &[LogEntry]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize activity log: {}", e);
                return;
            }
        };
        if let Err(e) = self.blob.write(&self.key, &json).await {
            error!("Failed to save activity log '{}': {}", self.key, e);
        }
    }
}

fn trim_front(entries: &mut Vec<LogEntry>, max: usize) {
    if entries.len() > max {
        let excess = entries.len() - max;
        entries.drain(..excess);
    }
}

fn mirror_to_tracing(entry: &LogEntry) {
    let data = entry
        .data
        .as_ref()
        .map(Value::to_string)
        .unwrap_or_default();
    match entry.level {
        LogLevel::Debug => debug!(target: "activity", data = %data, "{}", entry.message),
        LogLevel::Info => info!(target: "activity", data = %data, "{}", entry.message),
        LogLevel::Warn => warn!(target: "activity", data = %data, "{}", entry.message),
        LogLevel::Error => error!(target: "activity", data = %data, "{}", entry.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBlobStore;
    use chrono::Duration;
    use serde_json::json;

    fn config(max_entries: usize, level: &str) -> ActivityConfig {
        ActivityConfig {
            max_entries,
            level: level.to_string(),
        }
    }

    #[test]
    fn test_level_ordering_and_parsing() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("ERROR".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("verbose".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Info.to_string(), "INFO");
    }

    #[tokio::test]
    async fn test_entries_persist_across_reload() {
        let blob = Arc::new(MemoryBlobStore::new());
        let log = ActivityLog::load(blob.clone(), "logs", &config(10, "DEBUG")).await;
        log.info("URL shortened successfully", Some(json!({ "shortCode": "abc" })))
            .await
            .unwrap();
        log.warn("Validation failed", None).await.unwrap();

        let reloaded = ActivityLog::load(blob, "logs", &config(10, "DEBUG")).await;
        let entries = reloaded.entries().await;
        assert_eq!(entries, log.entries().await);
        assert_eq!(entries[0].data, Some(json!({ "shortCode": "abc" })));
        assert_eq!(entries[0].id.len(), 9);
    }

    #[tokio::test]
    async fn test_keeps_only_most_recent_entries() {
        let blob = Arc::new(MemoryBlobStore::new());
        let log = ActivityLog::load(blob, "logs", &config(3, "DEBUG")).await;
        for i in 0..5 {
            log.debug(format!("event {}", i), None).await;
        }

        let messages: Vec<_> = log.entries().await.into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["event 2", "event 3", "event 4"]);
    }

    #[tokio::test]
    async fn test_entries_below_level_are_dropped() {
        let blob = Arc::new(MemoryBlobStore::new());
        let log = ActivityLog::load(blob, "logs", &config(10, "warn")).await;

        assert!(log.info("ignored", None).await.is_none());
        assert!(log.error("kept", None).await.is_some());
        assert_eq!(log.entries().await.len(), 1);
        assert_eq!(log.by_level(LogLevel::Error).await.len(), 1);
        assert!(log.by_level(LogLevel::Info).await.is_empty());
    }

    #[tokio::test]
    async fn test_set_level_records_change() {
        let blob = Arc::new(MemoryBlobStore::new());
        let log = ActivityLog::load(blob, "logs", &config(10, "DEBUG")).await;
        log.set_level(LogLevel::Info).await;

        assert_eq!(log.level().await, LogLevel::Info);
        assert!(log.debug("hidden", None).await.is_none());
        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Log level changed");
        assert_eq!(entries[0].data, Some(json!({ "newLevel": "INFO" })));
    }

    #[tokio::test]
    async fn test_time_range_is_inclusive() {
        let blob = Arc::new(MemoryBlobStore::new());
        let log = ActivityLog::load(blob, "logs", &config(10, "DEBUG")).await;
        let entry = log.info("one", None).await.unwrap();

        assert_eq!(
            log.by_time_range(entry.timestamp, entry.timestamp).await.len(),
            1
        );
        let later = entry.timestamp + Duration::seconds(1);
        assert!(log.by_time_range(later, later + Duration::minutes(1)).await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_leaves_marker_entry() {
        let blob = Arc::new(MemoryBlobStore::new());
        let log = ActivityLog::load(blob.clone(), "logs", &config(10, "DEBUG")).await;
        log.info("a", None).await;
        log.info("b", None).await;

        log.clear().await;
        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Logs cleared");

        let persisted: Vec<LogEntry> =
            serde_json::from_str(&blob.read("logs").await.unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
    }

    #[tokio::test]
    async fn test_export_json_is_pretty_array() {
        let blob = Arc::new(MemoryBlobStore::new());
        let log = ActivityLog::load(blob, "logs", &config(10, "DEBUG")).await;
        log.info("exported", None).await;

        let exported = log.export_json().await.unwrap();
        assert!(exported.starts_with("[\n"));
        assert!(exported.contains("\"level\": \"INFO\""));
        assert!(exported.contains("\"data\": null"));
    }

    #[tokio::test]
    async fn test_corrupt_log_starts_empty() {
        let blob = Arc::new(MemoryBlobStore::new());
        blob.write("logs", "oops").await.unwrap();
        let log = ActivityLog::load(blob, "logs", &config(10, "DEBUG")).await;
        assert!(log.entries().await.is_empty());
    }
}
