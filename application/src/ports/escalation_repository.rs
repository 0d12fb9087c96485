//! Port for escalation record storage.
//!
//! Records are owned by the caller's store; the approval engine only
//! transforms values. Writers for one `escalation_id` are serialized by
//! [`SubmitApprovalUseCase`](crate::use_cases::submit_approval::SubmitApprovalUseCase),
//! so implementations only need plain get/save semantics.

use arbiter_domain::EscalationRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Escalation store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to encode escalation {id}: {message}")]
    Encoding { id: String, message: String },
}

#[async_trait]
pub trait EscalationRepository: Send + Sync {
    async fn get(&self, escalation_id: &str) -> Result<Option<EscalationRecord>, RepositoryError>;

    /// Insert or replace the record with the same `escalation_id`.
    async fn save(&self, record: &EscalationRecord) -> Result<(), RepositoryError>;

    async fn list(&self) -> Result<Vec<EscalationRecord>, RepositoryError>;
}
