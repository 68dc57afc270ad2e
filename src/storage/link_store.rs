//! In-memory link collection mirrored to a blob store
//!
//! The collection is the source of truth. Every mutation re-serializes the
//! whole collection under one key; a failed write is logged and leaves the
//! store dirty until a later write succeeds.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{BlobStore, ClickEvent, LinkRecord};
use crate::errors::{LinkstashError, Result};

pub struct LinkStore {
    blob: Arc<dyn BlobStore>,
    key: String,
    records: Vec<LinkRecord>,
    dirty: bool,
}

impl LinkStore {
    /// Cold start: reads and deserializes the collection stored under `key`.
    ///
    /// A missing blob is an empty collection. A blob that does not parse is
    /// copied aside to `<key>.corrupt` and the store starts empty; a failed
    /// read is returned to the caller since nothing safe can be assumed.
    ///
    /// Records that repeat an earlier id or short code, or that expire no
    /// later than they were created, are left out and written as a JSON
    /// array to `<key>.rejected`. The first occurrence of an id or code wins.
    pub async fn load(blob: Arc<dyn BlobStore>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let records = match blob.read(&key).await? {
            None => {
                info!("No stored links under '{}', starting empty", key);
                Vec::new()
            }
            Some(raw) => match Self::decode(&raw) {
                Ok((records, rejected)) => {
                    if !rejected.is_empty() {
                        Self::quarantine(blob.as_ref(), &key, &rejected).await;
                    }
                    records
                }
                Err(e) => {
                    error!("Failed to parse stored links under '{}': {}", key, e);
                    let backup = format!("{}.corrupt", key);
                    if let Err(e) = blob.write(&backup, &raw).await {
                        error!("Failed to back up unreadable links to '{}': {}", backup, e);
                    } else {
                        warn!("Unreadable links preserved under '{}'", backup);
                    }
                    Vec::new()
                }
            },
        };

        info!("Loaded {} links from {} store", records.len(), blob.backend_name());
        Ok(Self {
            blob,
            key,
            records,
            dirty: false,
        })
    }

    /// Splits a stored document into loadable records and rejected ones.
    fn decode(raw: &str) -> Result<(Vec<LinkRecord>, Vec<LinkRecord>)> {
        let stored: Vec<LinkRecord> = serde_json::from_str(raw)?;
        let mut ids = HashSet::new();
        let mut codes = HashSet::new();
        let mut records = Vec::with_capacity(stored.len());
        let mut rejected = Vec::new();

        for mut record in stored {
            let problem = if record.expires_at <= record.created_at {
                Some("expires no later than it was created")
            } else if ids.contains(&record.id) {
                Some("repeats an earlier id")
            } else if codes.contains(&record.short_code) {
                Some("repeats an earlier short code")
            } else {
                None
            };
            if let Some(problem) = problem {
                warn!(
                    "Skipping stored link '{}' (id '{}'): {}",
                    record.short_code, record.id, problem
                );
                rejected.push(record);
                continue;
            }

            if record.repair_click_counter() {
                warn!(
                    "Link '{}' had a click counter out of step with its history, repaired to {}",
                    record.short_code,
                    record.clicks()
                );
            }
            ids.insert(record.id.clone());
            codes.insert(record.short_code.clone());
            records.push(record);
        }
        Ok((records, rejected))
    }

    async fn quarantine(blob: &dyn BlobStore, key: &str, rejected: &[LinkRecord]) {
        let target = format!("{}.rejected", key);
        let written = match serde_json::to_string_pretty(rejected) {
            Ok(json) => blob.write(&target, &json).await,
            Err(e) => Err(e.into()),
        };
        match written {
            Ok(()) => warn!("{} stored links set aside under '{}'", rejected.len(), target),
            Err(e) => error!("Failed to set aside rejected links to '{}': {}", target, e),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the last write to the blob store failed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn find_by_id(&self, id: &str) -> Option<&LinkRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&LinkRecord> {
        self.records.iter().find(|r| r.short_code == code)
    }

    pub fn is_code_unique(&self, code: &str) -> bool {
        self.find_by_code(code).is_none()
    }

    /// Appends a new record and persists.
    ///
    /// Rejects duplicate ids and short codes without touching the collection.
    pub async fn insert(&mut self, record: LinkRecord) -> Result<()> {
        if !self.is_code_unique(&record.short_code) {
            return Err(LinkstashError::link_code_taken(format!(
                "Short code '{}' already exists",
                record.short_code
            )));
        }
        if self.find_by_id(&record.id).is_some() {
            return Err(LinkstashError::duplicate_id(format!(
                "Link id '{}' already exists",
                record.id
            )));
        }

        self.records.push(record);
        self.persist().await;
        Ok(())
    }

    /// Removes the record with `id`, persisting only when something changed.
    pub async fn remove(&mut self, id: &str) -> Option<LinkRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        let removed = self.records.remove(index);
        self.persist().await;
        Some(removed)
    }

    /// Appends `event` to the record's history and persists.
    pub async fn push_click(&mut self, id: &str, event: ClickEvent) -> Option<LinkRecord> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        record.push_click(event);
        let updated = record.clone();
        self.persist().await;
        Some(updated)
    }

    /// Writes the full collection, logging instead of failing.
    pub async fn persist(&mut self) {
        match self.write_all().await {
            Ok(()) => {
                if self.dirty {
                    info!("Link store '{}' is back in sync", self.key);
                }
                self.dirty = false;
                debug!("Saved {} links under '{}'", self.records.len(), self.key);
            }
            Err(e) => {
                self.dirty = true;
                error!(
                    "Failed to save {} links under '{}': {}",
                    self.records.len(),
                    self.key,
                    e
                );
            }
        }
    }

    /// Writes the full collection and reports the outcome.
    pub async fn flush(&mut self) -> Result<()> {
        let result = self.write_all().await;
        self.dirty = result.is_err();
        result
    }

    async fn write_all(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        self.blob.write(&self.key, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DIRECT_SOURCE, MemoryBlobStore, UNKNOWN_LOCATION};
    use chrono::{Duration, Utc};

    fn record(id: &str, code: &str) -> LinkRecord {
        let now = Utc::now();
        LinkRecord::new(id, "https://example.com", code, now, now + Duration::minutes(5))
    }

    #[tokio::test]
    async fn test_insert_persists_whole_collection() {
        let blob = Arc::new(MemoryBlobStore::new());
        let mut store = LinkStore::load(blob.clone(), "urls").await.unwrap();
        assert!(store.is_empty());

        store.insert(record("1", "aaa")).await.unwrap();
        store.insert(record("2", "bbb")).await.unwrap();

        let raw = blob.read("urls").await.unwrap().unwrap();
        let stored: Vec<LinkRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, store.records());
        assert_eq!(store.len(), 2);
        assert!(!store.is_dirty());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let blob = Arc::new(MemoryBlobStore::new());
        let mut store = LinkStore::load(blob, "urls").await.unwrap();
        store.insert(record("1", "same")).await.unwrap();

        let err = store.insert(record("2", "same")).await.unwrap_err();
        assert!(matches!(err, LinkstashError::LinkCodeTaken(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let blob = Arc::new(MemoryBlobStore::new());
        let mut store = LinkStore::load(blob, "urls").await.unwrap();
        store.insert(record("1", "aaa")).await.unwrap();

        let err = store.insert(record("1", "bbb")).await.unwrap_err();
        assert!(matches!(err, LinkstashError::DuplicateId(_)));
        assert!(!err.is_validation());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_noop() {
        let blob = Arc::new(MemoryBlobStore::new());
        let mut store = LinkStore::load(blob.clone(), "urls").await.unwrap();
        assert!(store.remove("nope").await.is_none());
        // nothing changed, nothing written
        assert!(blob.read("urls").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_push_click_updates_record() {
        let blob = Arc::new(MemoryBlobStore::new());
        let mut store = LinkStore::load(blob, "urls").await.unwrap();
        store.insert(record("1", "aaa")).await.unwrap();

        let event = ClickEvent::new(Utc::now(), DIRECT_SOURCE, UNKNOWN_LOCATION);
        let updated = store.push_click("1", event).await.unwrap();
        assert_eq!(updated.clicks(), 1);
        assert_eq!(store.find_by_code("aaa").unwrap().clicks(), 1);

        let event = ClickEvent::new(Utc::now(), DIRECT_SOURCE, UNKNOWN_LOCATION);
        assert!(store.push_click("missing", event).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_preserved() {
        let blob = Arc::new(MemoryBlobStore::new());
        blob.write("urls", "{not json").await.unwrap();

        let store = LinkStore::load(blob.clone(), "urls").await.unwrap();
        assert!(store.is_empty());
        assert_eq!(
            blob.read("urls.corrupt").await.unwrap().as_deref(),
            Some("{not json")
        );
    }
}
