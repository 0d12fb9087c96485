//! Infrastructure layer for arbiter
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, plus configuration file loading.

pub mod audit;
pub mod config;
pub mod definitions;
pub mod repository;

// Re-export commonly used types
pub use audit::JsonlAuditStore;
pub use config::{
    ConfigLoader, ConfigValidationError, FileAuditConfig, FileConfig, FileDefinitionsConfig,
    FileEscalationConfig, FileLoggingConfig, FileOutputConfig,
};
pub use definitions::{DefinitionLoadError, JsonDefinitionLoader};
pub use repository::InMemoryEscalationRepository;
