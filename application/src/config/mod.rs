//! Application-level configuration.
//!
//! - [`AuditParams`]: audit log directory and ring-buffer size
//! - [`ArbiterConfig`]: container for escalation, audit and definition settings

pub mod arbiter_config;

pub use arbiter_config::{ArbiterConfig, AuditParams};
