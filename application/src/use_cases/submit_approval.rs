//! Submit Approval use case
//!
//! Applies one role's decision to a stored escalation. Submissions for the
//! same `escalation_id` run one at a time so a stage completes exactly once
//! even when approvers race.

use crate::ports::escalation_repository::{EscalationRepository, RepositoryError};
use crate::services::AuditLogService;
use crate::use_cases::raise_escalation::Actor;
use arbiter_domain::{
    ApprovalDecision, ApprovalFlowEngine, ApprovalOutcome, AuditAction, AuditEvent,
};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SubmitApprovalError {
    #[error("Escalation not found: {0}")]
    NotFound(String),

    #[error("Escalation store error: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone)]
pub struct SubmitApprovalInput {
    pub escalation_id: String,
    /// Approver role the decision is made under
    pub role_id: String,
    pub decision: ApprovalDecision,
    pub actor: Actor,
}

impl SubmitApprovalInput {
    pub fn new(
        escalation_id: impl Into<String>,
        role_id: impl Into<String>,
        decision: ApprovalDecision,
    ) -> Self {
        let role_id = role_id.into();
        Self {
            escalation_id: escalation_id.into(),
            actor: Actor::new(role_id.clone(), role_id.clone()),
            role_id,
            decision,
        }
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }
}

type RecordLock = Arc<tokio::sync::Mutex<()>>;

pub struct SubmitApprovalUseCase {
    flows: Arc<ApprovalFlowEngine>,
    repository: Arc<dyn EscalationRepository>,
    audit: Arc<AuditLogService>,
    locks: Mutex<HashMap<String, RecordLock>>,
}

impl SubmitApprovalUseCase {
    pub fn new(
        flows: Arc<ApprovalFlowEngine>,
        repository: Arc<dyn EscalationRepository>,
        audit: Arc<AuditLogService>,
    ) -> Self {
        Self {
            flows,
            repository,
            audit,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, escalation_id: &str) -> RecordLock {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(escalation_id.to_string()).or_default().clone()
    }

    /// Drop the per-record lock once nobody else holds or waits on it.
    fn release(&self, escalation_id: &str, lock: RecordLock) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one here.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(escalation_id);
        }
    }

    pub async fn execute(
        &self,
        input: SubmitApprovalInput,
    ) -> Result<ApprovalOutcome, SubmitApprovalError> {
        let lock = self.lock_for(&input.escalation_id);
        let result = {
            let _guard = lock.lock().await;
            self.apply_locked(&input).await
        };
        self.release(&input.escalation_id, lock);
        result
    }

    async fn apply_locked(
        &self,
        input: &SubmitApprovalInput,
    ) -> Result<ApprovalOutcome, SubmitApprovalError> {
        let record = self
            .repository
            .get(&input.escalation_id)
            .await?
            .ok_or_else(|| SubmitApprovalError::NotFound(input.escalation_id.clone()))?;

        let outcome = self
            .flows
            .apply(record, &input.role_id, input.decision, Utc::now());
        if !outcome.transition.changed() {
            debug!(
                escalation_id = %input.escalation_id,
                role = %input.role_id,
                transition = ?outcome.transition,
                "Decision had no effect"
            );
            return Ok(outcome);
        }

        self.repository.save(&outcome.record).await?;

        let action = if input.decision.is_approve() {
            AuditAction::Approve
        } else {
            AuditAction::Reject
        };
        self.audit.log(
            AuditEvent::new(
                input.actor.user_id.clone(),
                input.actor.role.clone(),
                action,
                "escalation",
                input.escalation_id.clone(),
            )
            .with_details(json!({
                "approver_role_id": input.role_id,
                "transition": outcome.transition,
                "status": outcome.record.status,
                "current_stage_id": outcome.record.current_stage_id,
            })),
        );

        info!(
            escalation_id = %input.escalation_id,
            role = %input.role_id,
            decision = %input.decision,
            status = %outcome.record.status,
            "Decision applied"
        );
        Ok(outcome)
    }
}
