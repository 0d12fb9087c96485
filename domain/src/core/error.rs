//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These only surface from explicit parsing (`FromStr`) of domain values.
/// Deserialization of upstream data never produces them: unknown levels
/// degrade to their lowest variant instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid severity: {0}. Valid: LOW, MEDIUM, HIGH, CRITICAL")]
    InvalidSeverity(String),

    #[error("Invalid urgency: {0}. Valid: LOW, MEDIUM, HIGH, URGENT, IMMEDIATE")]
    InvalidUrgency(String),

    #[error("Invalid escalation stage: {0}")]
    InvalidStage(String),

    #[error("Invalid approval decision: {0}. Valid: approve, reject")]
    InvalidDecision(String),

    #[error("Invalid audit action: {0}")]
    InvalidAuditAction(String),
}
