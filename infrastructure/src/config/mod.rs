//! Configuration file loading for arbiter
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ARBITER_*` environment variables (`__` separates section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./arbiter.toml` or `./.arbiter.toml`
//! 4. Global: `$XDG_CONFIG_HOME/arbiter/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAuditConfig, FileConfig, FileDefinitionsConfig,
    FileEscalationConfig, FileLoggingConfig, FileOutputConfig,
};
pub use loader::ConfigLoader;
