use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns defaults when `init_config` has not run yet.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize (or replace) the global configuration
///
/// Loads `path`, or `linkstash.toml` in the current directory, overlaid by
/// `LS__*` environment variables.
pub fn init_config(path: Option<&str>) {
    let loaded = Arc::new(StaticConfig::load(path));
    CONFIG
        .get_or_init(|| ArcSwap::from(loaded.clone()))
        .store(loaded);
}
