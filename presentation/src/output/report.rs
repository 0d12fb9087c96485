//! Aggregated result of `arbiter run`

use arbiter_domain::{AnalysisResult, ApprovalOutcome, EscalationRecord, EscalationStatus, Transition};
use serde::Serialize;

/// One applied approval decision
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalStep {
    pub role_id: String,
    #[serde(flatten)]
    pub transition: Transition,
    pub status: EscalationStatus,
    pub current_stage_id: Option<String>,
}

impl ApprovalStep {
    pub fn new(role_id: impl Into<String>, outcome: &ApprovalOutcome) -> Self {
        Self {
            role_id: role_id.into(),
            transition: outcome.transition.clone(),
            status: outcome.record.status,
            current_stage_id: outcome.record.current_stage_id.clone(),
        }
    }
}

/// Everything a scenario run produced, in order
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub analysis: AnalysisResult,
    pub escalation: Option<EscalationRecord>,
    pub approvals: Vec<ApprovalStep>,
    /// Record state after all decisions; absent when nothing escalated
    pub final_record: Option<EscalationRecord>,
}

impl RunReport {
    pub fn new(analysis: AnalysisResult, escalation: Option<EscalationRecord>) -> Self {
        Self {
            analysis,
            escalation,
            approvals: Vec::new(),
            final_record: None,
        }
    }

    pub fn push(&mut self, role_id: &str, outcome: &ApprovalOutcome) {
        self.approvals.push(ApprovalStep::new(role_id, outcome));
        self.final_record = Some(outcome.record.clone());
    }
}
