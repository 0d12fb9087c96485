//! Ports (interfaces) for external adapters.
//!
//! Implemented by the infrastructure layer:
//!
//! - [`escalation_repository::EscalationRepository`]: escalation record storage
//! - [`audit_store::AuditStore`]: hash-chained audit persistence

pub mod audit_store;
pub mod escalation_repository;
