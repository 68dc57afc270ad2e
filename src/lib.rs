//! linkstash - expiring short links with click statistics
//!
//! This library provides the core of the linkstash tool: short-code
//! generation, a key/value blob store with file and in-memory backends,
//! the link store, click recording with expiry checks, statistics and a
//! persistent activity log.
//!
//! # Features
//! - **cli**: Command-line interface (default)
//!
//! # Architecture
//! - `storage`: Blob backends, record model and the persisted link collection
//! - `services`: Link lifecycle, redirect resolution and the activity log
//! - `analytics`: Expiry evaluation, statistics and location lookup
//! - `interfaces`: User interfaces (CLI)
//! - `config`: Configuration management
//! - `system`: Logging setup

pub mod analytics;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
