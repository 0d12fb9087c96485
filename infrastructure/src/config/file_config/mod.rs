//! Raw TOML configuration data types
//!
//! These structs mirror the config file sections and are deserialized
//! directly; [`FileConfig::to_arbiter_config`] converts them into the
//! application's [`ArbiterConfig`].

mod audit;
mod definitions;
mod escalation;
mod logging;
mod output;

pub use audit::FileAuditConfig;
pub use definitions::FileDefinitionsConfig;
pub use escalation::FileEscalationConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;

use arbiter_application::{ArbiterConfig, AuditParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("escalation.threshold must be within 0..=100, got {0}")]
    ThresholdOutOfRange(u32),

    #[error("escalation.debounce_hours cannot be 0")]
    ZeroDebounceWindow,

    #[error("{0} cannot be 0")]
    ZeroCapacity(&'static str),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub escalation: FileEscalationConfig,
    pub audit: FileAuditConfig,
    pub definitions: FileDefinitionsConfig,
    pub logging: FileLoggingConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        let escalation = &self.escalation;

        if escalation.threshold > 100 {
            issues.push(ConfigValidationError::ThresholdOutOfRange(
                escalation.threshold,
            ));
        }
        if escalation.debounce_hours == 0 {
            issues.push(ConfigValidationError::ZeroDebounceWindow);
        }
        if escalation.debounce_capacity == 0 {
            issues.push(ConfigValidationError::ZeroCapacity(
                "escalation.debounce_capacity",
            ));
        }
        if self.audit.memory_capacity == 0 {
            issues.push(ConfigValidationError::ZeroCapacity("audit.memory_capacity"));
        }

        issues
    }

    pub fn to_arbiter_config(&self) -> ArbiterConfig {
        ArbiterConfig::new(
            self.escalation.to_settings(),
            AuditParams {
                dir: self.audit.dir.clone(),
                memory_capacity: self.audit.memory_capacity,
            },
            self.definitions.dir.clone(),
        )
    }
}
