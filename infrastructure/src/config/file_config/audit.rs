//! Audit configuration from TOML (`[audit]` section)

use arbiter_application::config::arbiter_config::{DEFAULT_AUDIT_DIR, DEFAULT_MEMORY_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// Directory for `audit_YYYYMMDD.jsonl` files
    pub dir: PathBuf,
    /// Recent entries kept in memory
    pub memory_capacity: usize,
}

impl Default for FileAuditConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_AUDIT_DIR),
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
        }
    }
}
