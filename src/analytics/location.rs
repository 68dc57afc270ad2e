//! 访问位置抽象层
//!
//! 只提供粗略的位置描述，不做真实的 IP 地理定位。根据配置选择实现：
//! - `unknown`：始终返回 "Unknown"
//! - `mock`：从固定城市列表中随机挑选

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::AnalyticsConfig;
use crate::storage::UNKNOWN_LOCATION;

/// 位置查询 trait
#[async_trait]
pub trait LocationLookup: Send + Sync {
    /// 查询客户端的大致位置，`None` 表示无法判断
    async fn lookup(&self, client_ip: Option<&str>) -> Option<String>;

    /// provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// Never knows anything.
pub struct UnknownLocation;

#[async_trait]
impl LocationLookup for UnknownLocation {
    async fn lookup(&self, _client_ip: Option<&str>) -> Option<String> {
        None
    }

    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// Picks a city at random, ignoring the client.
pub struct MockLocationPool {
    locations: Vec<String>,
}

impl MockLocationPool {
    pub const DEFAULT_LOCATIONS: [&'static str; 5] = [
        "New York, US",
        "London, UK",
        "Tokyo, JP",
        "Mumbai, IN",
        "Sydney, AU",
    ];

    pub fn new(locations: Vec<String>) -> Self {
        Self { locations }
    }
}

impl Default for MockLocationPool {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_LOCATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

#[async_trait]
impl LocationLookup for MockLocationPool {
    async fn lookup(&self, _client_ip: Option<&str>) -> Option<String> {
        if self.locations.is_empty() {
            return None;
        }
        let index = rand::random_range(0..self.locations.len());
        self.locations.get(index).cloned()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// 统一位置 Provider，未知时回退到 "Unknown"
#[derive(Clone)]
pub struct LocationProvider {
    inner: Arc<dyn LocationLookup>,
}

impl LocationProvider {
    pub fn new(config: &AnalyticsConfig) -> Self {
        let inner: Arc<dyn LocationLookup> = match config.location_provider.as_str() {
            "mock" => Arc::new(MockLocationPool::default()),
            "unknown" => Arc::new(UnknownLocation),
            other => {
                warn!(
                    "Unknown location provider '{}', falling back to 'unknown'",
                    other
                );
                Arc::new(UnknownLocation)
            }
        };
        debug!("Location provider: {}", inner.name());
        Self { inner }
    }

    pub fn from_lookup(inner: Arc<dyn LocationLookup>) -> Self {
        Self { inner }
    }

    pub async fn locate(&self, client_ip: Option<&str>) -> String {
        self.inner
            .lookup(client_ip)
            .await
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl Default for LocationProvider {
    fn default() -> Self {
        Self::from_lookup(Arc::new(UnknownLocation))
    }
}
