//! Application layer for arbiter
//!
//! This crate contains use cases, port definitions, the audit log service and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod services;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ArbiterConfig, AuditParams};
pub use ports::{
    audit_store::{AuditStore, AuditStoreError, NoAuditStore},
    escalation_repository::{EscalationRepository, RepositoryError},
};
pub use services::AuditLogService;
pub use use_cases::assess_analysis::{AssessAnalysisInput, AssessAnalysisUseCase};
pub use use_cases::raise_escalation::{
    Actor, RaiseEscalationError, RaiseEscalationInput, RaiseEscalationUseCase,
};
pub use use_cases::submit_approval::{
    SubmitApprovalError, SubmitApprovalInput, SubmitApprovalUseCase,
};
