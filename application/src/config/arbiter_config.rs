//! Arbiter configuration container.
//!
//! [`ArbiterConfig`] groups the runtime settings handed to use cases and
//! services. The infrastructure loader builds it from layered files; tests
//! build it directly with the `with_*` methods.

use arbiter_domain::EscalationSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_AUDIT_DIR: &str = "logs/audit";
pub const DEFAULT_MEMORY_CAPACITY: usize = 1000;
pub const DEFAULT_DEFINITIONS_DIR: &str = "config/definitions";

/// Audit log placement and in-memory retention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditParams {
    /// Directory holding the daily JSONL files.
    pub dir: PathBuf,
    /// Entries kept in the in-memory ring buffer.
    pub memory_capacity: usize,
}

impl Default for AuditParams {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_AUDIT_DIR),
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbiterConfig {
    escalation: EscalationSettings,
    audit: AuditParams,
    definitions_dir: PathBuf,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            escalation: EscalationSettings::default(),
            audit: AuditParams::default(),
            definitions_dir: PathBuf::from(DEFAULT_DEFINITIONS_DIR),
        }
    }
}

impl ArbiterConfig {
    pub fn new(escalation: EscalationSettings, audit: AuditParams, definitions_dir: PathBuf) -> Self {
        Self {
            escalation,
            audit,
            definitions_dir,
        }
    }

    // ==================== Accessors ====================

    pub fn escalation(&self) -> &EscalationSettings {
        &self.escalation
    }

    pub fn audit(&self) -> &AuditParams {
        &self.audit
    }

    /// Directory containing `raci.json` and `approval_flows.json`.
    pub fn definitions_dir(&self) -> &Path {
        &self.definitions_dir
    }

    // ==================== Builder Methods ====================

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.escalation.threshold = threshold;
        self
    }

    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.escalation.demo_mode = demo_mode;
        self
    }

    pub fn without_enhanced_features(mut self) -> Self {
        self.escalation.enhanced_features = false;
        self
    }

    pub fn with_audit_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.audit.dir = dir.into();
        self
    }

    pub fn with_definitions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.definitions_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ArbiterConfig::default();
        assert_eq!(config.escalation().threshold, 70);
        assert!(!config.escalation().demo_mode);
        assert!(config.escalation().enhanced_features);
        assert_eq!(config.audit().memory_capacity, 1000);
        assert_eq!(config.audit().dir, PathBuf::from("logs/audit"));
        assert_eq!(config.definitions_dir(), Path::new("config/definitions"));
    }

    #[test]
    fn test_builders() {
        let config = ArbiterConfig::default()
            .with_threshold(50)
            .with_demo_mode(true)
            .without_enhanced_features()
            .with_audit_dir("/tmp/audit");
        assert_eq!(config.escalation().threshold, 50);
        assert!(config.escalation().demo_mode);
        assert!(!config.escalation().enhanced_features);
        assert_eq!(config.audit().dir, PathBuf::from("/tmp/audit"));
    }
}
