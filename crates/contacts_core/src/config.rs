//! Runtime configuration for the contacts core.
//!
//! # Responsibility
//! - Describe where the database lives, how it is upgraded, how many
//!   workers run store calls, and how logging is set up.
//! - Parse the same shape from JSON so embedders can ship a config file.
//!
//! # Invariants
//! - A validated config always has at least one worker and one queue slot.

use crate::db::schema::DATABASE_NAME;
use crate::db::UpgradePolicy;
use crate::logging::default_log_level;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_WORKER_THREADS: usize = 2;
const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Top-level configuration consumed at process start.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// What to do when the stored schema version differs from this build.
    pub upgrade_policy: UpgradePolicy,
    /// Background workers running store calls.
    pub worker_threads: usize,
    /// Jobs that may wait for a worker before submissions are rejected.
    pub queue_capacity: usize,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DATABASE_NAME),
            upgrade_policy: UpgradePolicy::default(),
            worker_threads: DEFAULT_WORKER_THREADS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| format!("invalid config json: {err}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.db_path.as_os_str().is_empty() {
            return Err("db_path cannot be empty".to_string());
        }
        if self.worker_threads == 0 {
            return Err("worker_threads must be at least 1".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be at least 1".to_string());
        }
        Ok(())
    }
}
