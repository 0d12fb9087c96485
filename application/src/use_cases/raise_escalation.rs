//! Raise Escalation use case
//!
//! Threshold check → escalation ladder → responsibility and approval flow →
//! store → audit.

use crate::ports::escalation_repository::{EscalationRepository, RepositoryError};
use crate::services::AuditLogService;
use arbiter_domain::{
    AnalysisResult, ApprovalFlowEngine, AuditAction, AuditEvent, EscalationEngine,
    EscalationRecord, EvidenceSources, ResponsibilityResolver,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RaiseEscalationError {
    #[error("Failed to store escalation: {0}")]
    Repository(#[from] RepositoryError),
}

/// Who triggered an action, as recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
        }
    }

    pub fn system() -> Self {
        Self::new("system", "system")
    }
}

#[derive(Debug, Clone)]
pub struct RaiseEscalationInput {
    pub analysis_id: String,
    pub analysis: AnalysisResult,
    pub evidence: Option<EvidenceSources>,
    pub actor: Actor,
}

impl RaiseEscalationInput {
    pub fn new(analysis_id: impl Into<String>, analysis: AnalysisResult) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            analysis,
            evidence: None,
            actor: Actor::system(),
        }
    }

    pub fn with_evidence(mut self, evidence: EvidenceSources) -> Self {
        self.evidence = Some(evidence);
        self
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }
}

pub struct RaiseEscalationUseCase {
    engine: Arc<EscalationEngine>,
    resolver: Arc<ResponsibilityResolver>,
    flows: Arc<ApprovalFlowEngine>,
    repository: Arc<dyn EscalationRepository>,
    audit: Arc<AuditLogService>,
}

impl RaiseEscalationUseCase {
    pub fn new(
        engine: Arc<EscalationEngine>,
        resolver: Arc<ResponsibilityResolver>,
        flows: Arc<ApprovalFlowEngine>,
        repository: Arc<dyn EscalationRepository>,
        audit: Arc<AuditLogService>,
    ) -> Self {
        Self {
            engine,
            resolver,
            flows,
            repository,
            audit,
        }
    }

    /// Returns `None` when the analysis stays below threshold or the
    /// notification was debounced.
    pub async fn execute(
        &self,
        input: RaiseEscalationInput,
    ) -> Result<Option<EscalationRecord>, RaiseEscalationError> {
        if !self.engine.should_escalate(&input.analysis) {
            debug!(analysis_id = %input.analysis_id, "Below escalation threshold");
            return Ok(None);
        }

        let Some(record) = self.engine.create_escalation(
            &input.analysis_id,
            &input.analysis,
            input.evidence.as_ref(),
        ) else {
            return Ok(None);
        };

        let responsibility = self.resolver.resolve(&input.analysis);
        let record = self.flows.initialize(record, &responsibility);
        self.repository.save(&record).await?;

        self.audit.log(
            AuditEvent::new(
                input.actor.user_id,
                input.actor.role,
                AuditAction::Escalate,
                "analysis",
                input.analysis_id,
            )
            .with_details(json!({
                "escalation_id": record.escalation_id,
                "tier": record.tier,
                "stage": record.stage,
                "type": record.kind,
                "score": record.score,
                "approval_flow_id": record.approval_flow_id,
            })),
        );

        info!(
            escalation_id = %record.escalation_id,
            flow = ?record.approval_flow_id,
            stage_id = ?record.current_stage_id,
            "Escalation raised"
        );
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::audit_store::NoAuditStore;
    use crate::use_cases::test_support::{MemoryRepository, definitions};
    use arbiter_domain::{EscalationSettings, EscalationTier, Finding, Severity, Urgency};

    fn use_case(
        repository: Arc<MemoryRepository>,
        audit: Arc<AuditLogService>,
    ) -> RaiseEscalationUseCase {
        let definitions = definitions();
        RaiseEscalationUseCase::new(
            Arc::new(EscalationEngine::new(&EscalationSettings::default(), None)),
            Arc::new(ResponsibilityResolver::new(definitions.clone())),
            Arc::new(ApprovalFlowEngine::new(definitions)),
            repository,
            audit,
        )
    }

    fn analysis(score: u32, severity: Severity) -> AnalysisResult {
        AnalysisResult {
            findings: vec![Finding::new("B1_justification_phase", "plan kept")],
            overall_score: score,
            severity,
            urgency: Urgency::High,
            rule_score: Some(f64::from(score)),
            llm_score: Some(f64::from(score)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_below_threshold_creates_nothing() {
        let repository = Arc::new(MemoryRepository::default());
        let audit = Arc::new(AuditLogService::new(Arc::new(NoAuditStore), 10));
        let result = use_case(repository.clone(), audit.clone())
            .execute(RaiseEscalationInput::new("a-1", analysis(30, Severity::Low)))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(repository.list().await.unwrap().is_empty());
        assert!(audit.get_logs(&Default::default()).is_empty());
    }

    #[tokio::test]
    async fn test_escalation_is_stored_and_audited() {
        let repository = Arc::new(MemoryRepository::default());
        let audit = Arc::new(AuditLogService::new(Arc::new(NoAuditStore), 10));
        let record = use_case(repository.clone(), audit.clone())
            .execute(
                RaiseEscalationInput::new("a-1", analysis(85, Severity::High))
                    .with_actor(Actor::new("u-1", "Analyst")),
            )
            .await
            .unwrap()
            .expect("escalation created");

        assert_eq!(record.tier, EscalationTier::Staged);
        assert_eq!(record.approval_flow_id.as_deref(), Some("two_step"));
        assert_eq!(record.current_stage_id.as_deref(), Some("manager"));
        assert_eq!(record.target_roles, vec!["CFO"]);

        let stored = repository.get(&record.escalation_id).await.unwrap();
        assert_eq!(stored, Some(record.clone()));

        let logs = audit.get_logs(&Default::default());
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, AuditAction::Escalate);
        assert_eq!(logs[0].user_id, "u-1");
        assert_eq!(logs[0].details["escalation_id"], record.escalation_id.as_str());
    }

    #[tokio::test]
    async fn test_repeat_within_window_is_debounced() {
        let repository = Arc::new(MemoryRepository::default());
        let audit = Arc::new(AuditLogService::new(Arc::new(NoAuditStore), 10));
        let use_case = use_case(repository.clone(), audit);

        // APPROVAL_REQUEST (score 75) is subject to debounce, unlike FORCED_AGENDA.
        let first = use_case
            .execute(RaiseEscalationInput::new("a-1", analysis(75, Severity::Medium)))
            .await
            .unwrap();
        let second = use_case
            .execute(RaiseEscalationInput::new("a-2", analysis(75, Severity::Medium)))
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(repository.list().await.unwrap().len(), 1);
    }
}
