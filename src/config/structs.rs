use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "linkstash.toml";

/// 静态配置（从 TOML + 环境变量加载，启动时使用）
///
/// - storage: 存储后端与 blob key
/// - links: 短链生成与有效期
/// - activity: 活动日志
/// - logging: tracing 日志输出
/// - analytics: 点击来源/位置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置，失败时回退到默认值
    ///
    /// 优先级：ENV > TOML > 默认值
    /// ENV 前缀：LS，分隔符：__
    /// 示例：LS__LINKS__CODE_LENGTH=8
    pub fn load(path: Option<&str>) -> Self {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        match Self::try_load(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    /// 加载配置并返回错误（文件可选）
    pub fn try_load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("LS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize::<StaticConfig>()?)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// file | memory
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_links_key")]
    pub links_key: String,
    #[serde(default = "default_logs_key")]
    pub logs_key: String,
}

/// 短链配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinksConfig {
    /// 用于拼接完整短链接
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_validity_minutes")]
    pub default_validity_minutes: i64,
    /// 创建时的模拟延迟（毫秒），0 表示不延迟
    #[serde(default)]
    pub create_delay_ms: u64,
}

/// 活动日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityConfig {
    #[serde(default = "default_activity_max_entries")]
    pub max_entries: usize,
    /// DEBUG | INFO | WARN | ERROR
    #[serde(default = "default_activity_level")]
    pub level: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// text | json
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default)]
    pub enable_rotation: bool,
}

/// 点击分析配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    /// unknown | mock
    #[serde(default = "default_location_provider")]
    pub location_provider: String,
}

// ============================================================
// Default value functions
// ============================================================

fn default_storage_backend() -> String {
    "file".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_links_key() -> String {
    "urls".to_string()
}

fn default_logs_key() -> String {
    "urlShortenerLogs".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_code_length() -> usize {
    crate::utils::DEFAULT_CODE_LENGTH
}

fn default_validity_minutes() -> i64 {
    30
}

fn default_activity_max_entries() -> usize {
    1000
}

fn default_activity_level() -> String {
    "DEBUG".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_location_provider() -> String {
    "unknown".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_dir: default_data_dir(),
            links_key: default_links_key(),
            logs_key: default_logs_key(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            code_length: default_code_length(),
            default_validity_minutes: default_validity_minutes(),
            create_delay_ms: 0,
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            max_entries: default_activity_max_entries(),
            level: default_activity_level(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: false,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            location_provider: default_location_provider(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.storage.backend, "file");
        assert_eq!(config.storage.links_key, "urls");
        assert_eq!(config.storage.logs_key, "urlShortenerLogs");
        assert_eq!(config.links.code_length, 6);
        assert_eq!(config.links.default_validity_minutes, 30);
        assert_eq!(config.links.create_delay_ms, 0);
        assert_eq!(config.activity.max_entries, 1000);
        assert_eq!(config.analytics.location_provider, "unknown");
    }

    #[test]
    fn test_sample_config_parses_back() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[storage]"));
        assert!(sample.contains("[links]"));

        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, StaticConfig::default());
    }

    #[test]
    fn test_try_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[links]\ncode_length = 8\nbase_url = \"https://s.example\"").unwrap();

        let config = StaticConfig::try_load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.links.code_length, 8);
        assert_eq!(config.links.base_url, "https://s.example");
        assert_eq!(config.links.default_validity_minutes, 30);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_try_load_missing_file_uses_defaults() {
        let config = StaticConfig::try_load("/nonexistent/linkstash-test.toml").unwrap();
        assert_eq!(config.links, LinksConfig::default());
    }
}
