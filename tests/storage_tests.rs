//! Storage tests
//!
//! File-backed persistence across restarts and loading of older documents.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use linkstash::config::{StaticConfig, StorageConfig};
use linkstash::services::{CreateLinkRequest, LinkService, LogLevel};
use linkstash::storage::{BlobStore, FileBlobStore, LinkStore, StorageFactory};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> StaticConfig {
    let mut config = StaticConfig::default();
    config.storage = StorageConfig {
        backend: "file".to_string(),
        data_dir: dir.path().to_string_lossy().into_owned(),
        ..StorageConfig::default()
    };
    config
}

async fn open(config: &StaticConfig) -> LinkService {
    let blob = StorageFactory::create(&config.storage).expect("Failed to create storage");
    LinkService::open(blob, config)
        .await
        .expect("Failed to open service")
}

#[tokio::test]
async fn test_file_store_restart_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::milliseconds(123);

    let saved = {
        let service = open(&config).await;
        let link = service
            .create_link_at(
                CreateLinkRequest::new("https://example.com/persist", 60 * 24 * 365 * 100)
                    .with_code("persist"),
                created,
            )
            .await
            .unwrap();
        service
            .record_click_at(
                &link.id,
                "https://google.com",
                "London",
                created + Duration::seconds(5),
            )
            .await
            .unwrap()
    };

    assert!(dir.path().join("urls.json").exists());
    assert!(dir.path().join("urlShortenerLogs.json").exists());

    let service = open(&config).await;
    let loaded = service.find_by_code("persist").await.unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.created_at, created);
    assert_eq!(loaded.clicks(), 1);
}

#[tokio::test]
async fn test_activity_log_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    {
        let service = open(&config).await;
        service
            .create_link(CreateLinkRequest::new("https://example.com", 30))
            .await
            .unwrap();
    }

    let service = open(&config).await;
    let entries = service.activity().entries().await;
    assert!(
        entries
            .iter()
            .any(|e| e.message == "URL shortened successfully")
    );
    assert!(
        service
            .activity()
            .by_level(LogLevel::Info)
            .await
            .iter()
            .all(|e| e.level == LogLevel::Info)
    );
}

#[tokio::test]
async fn test_loads_legacy_document() {
    let dir = TempDir::new().unwrap();
    let blob = FileBlobStore::new(dir.path());
    let legacy = r#"[
        {
            "id": 1700000000000,
            "originalUrl": "https://example.com/legacy",
            "shortcode": "abc123",
            "createdDate": "2023-11-14T22:13:20.000Z",
            "expiryDate": "2023-11-14T22:43:20.000Z",
            "clicks": 2,
            "clickData": [
                {"timestamp": "2023-11-14T22:14:00.000Z", "source": "direct", "location": "London"},
                {"timestamp": "2023-11-14T22:15:00.000Z", "source": "https://bing.com", "location": "Tokyo"}
            ]
        }
    ]"#;
    blob.write("urls", legacy).await.unwrap();

    let store = LinkStore::load(Arc::new(blob), "urls").await.unwrap();
    let record = store.find_by_code("abc123").unwrap();
    assert_eq!(record.id, "1700000000000");
    assert_eq!(record.clicks(), 2);
    assert_eq!(record.click_history()[1].referrer_source, "https://bing.com");
    assert_eq!(record.validity(), Duration::minutes(30));
}

#[tokio::test]
async fn test_counter_out_of_step_is_repaired_on_load() {
    let dir = TempDir::new().unwrap();
    let blob = FileBlobStore::new(dir.path());
    let doc = r#"[{
        "id": "x",
        "originalUrl": "https://example.com",
        "shortCode": "fixme",
        "createdAt": "2024-01-01T00:00:00Z",
        "expiresAt": "2024-01-01T01:00:00Z",
        "clicks": 7,
        "clickHistory": [
            {"timestamp": "2024-01-01T00:10:00Z", "referrerSource": "direct", "approximateLocation": "Unknown"}
        ]
    }]"#;
    blob.write("urls", doc).await.unwrap();

    let store = LinkStore::load(Arc::new(blob), "urls").await.unwrap();
    let record = store.find_by_code("fixme").unwrap();
    assert_eq!(record.clicks(), 1);
}

#[tokio::test]
async fn test_corrupt_document_starts_empty_and_is_kept() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    tokio::fs::write(dir.path().join("urls.json"), "{ not json")
        .await
        .unwrap();

    let service = open(&config).await;
    assert!(service.get_all().await.is_empty());

    let backup = tokio::fs::read_to_string(dir.path().join("urls.corrupt.json"))
        .await
        .unwrap();
    assert_eq!(backup, "{ not json");
}

#[tokio::test]
async fn test_memory_backend_from_factory() {
    let config = StaticConfig {
        storage: StorageConfig {
            backend: "memory".to_string(),
            ..StorageConfig::default()
        },
        ..StaticConfig::default()
    };

    let blob = StorageFactory::create(&config.storage).unwrap();
    assert_eq!(blob.backend_name(), "memory");
    assert!(StorageFactory::create(&StorageConfig {
        backend: "postgres".to_string(),
        ..StorageConfig::default()
    })
    .is_err());
}

#[tokio::test]
async fn test_records_breaking_invariants_are_set_aside_on_load() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let doc = r#"[
        {
            "id": 1,
            "originalUrl": "https://a.example",
            "shortcode": "dup",
            "createdDate": "2024-01-01T00:00:00.000Z",
            "expiryDate": "2024-01-01T00:30:00.000Z"
        },
        {
            "id": 1,
            "originalUrl": "https://b.example",
            "shortcode": "other",
            "createdDate": "2024-01-01T00:00:00.000Z",
            "expiryDate": "2024-01-01T00:30:00.000Z"
        },
        {
            "id": 2,
            "originalUrl": "https://c.example",
            "shortcode": "dup",
            "createdDate": "2024-01-01T00:00:00.000Z",
            "expiryDate": "2024-01-01T00:30:00.000Z"
        },
        {
            "id": 3,
            "originalUrl": "https://d.example",
            "shortcode": "backwards",
            "createdDate": "2024-01-01T00:30:00.000Z",
            "expiryDate": "2024-01-01T00:00:00.000Z"
        }
    ]"#;
    tokio::fs::write(dir.path().join("urls.json"), doc)
        .await
        .unwrap();

    let service = open(&config).await;
    let all = service.get_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "1");
    assert_eq!(all[0].original_url, "https://a.example");
    assert!(all.iter().all(|r| r.expires_at > r.created_at));

    // deleting the surviving id leaves nothing behind under that id or code
    assert!(service.delete_link("1").await);
    assert!(service.find_by_id("1").await.is_none());
    assert!(service.find_by_code("dup").await.is_none());

    let rejected = tokio::fs::read_to_string(dir.path().join("urls.rejected.json"))
        .await
        .unwrap();
    let rejected: Vec<serde_json::Value> = serde_json::from_str(&rejected).unwrap();
    let urls: Vec<&str> = rejected
        .iter()
        .map(|r| r["originalUrl"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        vec!["https://b.example", "https://c.example", "https://d.example"]
    );
}
