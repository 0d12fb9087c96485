//! Approval flow engine
//!
//! Applies role decisions to an escalation record, one stage at a time.
//! Records are values: every call returns the updated record and leaves
//! persistence to the caller.

use super::decision::ApprovalDecision;
use super::definitions::{ApprovalFlowTemplate, DefinitionSource};
use super::quorum::StageQuorum;
use super::resolver::Responsibility;
use crate::escalation::{EscalationRecord, EscalationStatus, StageApproval};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// What a decision did to the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    /// Nothing changed
    Ignored { reason: String },
    /// Approval stored, stage still waiting on other roles
    Recorded { stage_id: String, missing: Vec<String> },
    /// Stage quorum reached, flow moved on
    StageCompleted { from: String, to: String },
    Approved,
    Rejected,
}

impl Transition {
    fn ignored(reason: impl Into<String>) -> Self {
        Transition::Ignored {
            reason: reason.into(),
        }
    }

    pub fn changed(&self) -> bool {
        !matches!(self, Transition::Ignored { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub record: EscalationRecord,
    pub transition: Transition,
}

impl ApprovalOutcome {
    fn unchanged(record: EscalationRecord, reason: impl Into<String>) -> Self {
        debug!(escalation_id = %record.escalation_id, "Approval ignored");
        Self {
            record,
            transition: Transition::ignored(reason),
        }
    }
}

pub struct ApprovalFlowEngine {
    definitions: Arc<dyn DefinitionSource>,
}

impl ApprovalFlowEngine {
    pub fn new(definitions: Arc<dyn DefinitionSource>) -> Self {
        Self { definitions }
    }

    pub fn get_template(&self, flow_id: &str) -> Option<ApprovalFlowTemplate> {
        let catalog = self.definitions.approval_flows()?;
        catalog.template(flow_id).cloned()
    }

    /// Attach a resolved flow to a freshly created record.
    ///
    /// Questions keep their clarification audience; other records that need
    /// action are routed to the responsible roles.
    pub fn initialize(
        &self,
        mut record: EscalationRecord,
        responsibility: &Responsibility,
    ) -> EscalationRecord {
        if !record.is_question() && record.action_required {
            record.target_roles = responsibility.target_roles.clone();
        }
        record.approval_flow_id = responsibility.approval_flow_id.clone();
        record.current_stage_id = record
            .approval_flow_id
            .as_deref()
            .and_then(|flow_id| self.get_template(flow_id))
            .and_then(|t| t.initial_stage_id().map(str::to_string));
        record
    }

    pub fn record_approval(
        &self,
        record: EscalationRecord,
        role_id: &str,
        decision: ApprovalDecision,
    ) -> EscalationRecord {
        self.apply(record, role_id, decision, Utc::now()).record
    }

    pub fn apply(
        &self,
        mut record: EscalationRecord,
        role_id: &str,
        decision: ApprovalDecision,
        now: DateTime<Utc>,
    ) -> ApprovalOutcome {
        if record.is_terminal() {
            let reason = format!("escalation already {}", record.status);
            return ApprovalOutcome::unchanged(record, reason);
        }

        let Some(template) = record
            .approval_flow_id
            .as_deref()
            .and_then(|flow_id| self.get_template(flow_id))
        else {
            return ApprovalOutcome::unchanged(record, "no approval flow");
        };

        let current = match record.current_stage_id.clone() {
            Some(stage_id) => stage_id,
            None => match template.initial_stage_id() {
                Some(initial) => initial.to_string(),
                None => return ApprovalOutcome::unchanged(record, "flow has no approval stage"),
            },
        };
        let Some(stage) = template.stage(&current) else {
            let reason = format!("unknown stage {current}");
            return ApprovalOutcome::unchanged(record, reason);
        };
        if !stage.is_approver(role_id) {
            let reason = format!("{role_id} is not an approver of {current}");
            return ApprovalOutcome::unchanged(record, reason);
        }
        record.current_stage_id = Some(current.clone());

        // A current-stage approver may reject at any stage.
        if decision == ApprovalDecision::Reject {
            record.status = EscalationStatus::Rejected;
            info!(
                escalation_id = %record.escalation_id,
                stage = %current,
                role = role_id,
                "Escalation rejected"
            );
            return ApprovalOutcome {
                record,
                transition: Transition::Rejected,
            };
        }

        if record.has_approved(&current, role_id) {
            let reason = format!("{role_id} already approved {current}");
            return ApprovalOutcome::unchanged(record, reason);
        }
        record
            .stage_approvals
            .entry(current.clone())
            .or_default()
            .push(StageApproval {
                role_id: role_id.to_string(),
                approved_at: now,
            });

        let quorum = StageQuorum::of(stage, &record);
        if !quorum.is_satisfied() {
            let missing = quorum.missing().into_iter().map(str::to_string).collect();
            debug!(stage = %current, progress = %quorum.description(), "Approval recorded");
            return ApprovalOutcome {
                record,
                transition: Transition::Recorded {
                    stage_id: current,
                    missing,
                },
            };
        }

        let transition = match stage.next.as_deref() {
            Some(next) if !stage.is_final() => {
                record.current_stage_id = Some(next.to_string());
                Transition::StageCompleted {
                    from: current,
                    to: next.to_string(),
                }
            }
            _ => {
                record.status = EscalationStatus::Approved;
                Transition::Approved
            }
        };
        info!(escalation_id = %record.escalation_id, ?transition, "Approval stage completed");
        ApprovalOutcome { record, transition }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::definitions::{ApprovalFlowCatalog, ApprovalStage, StaticDefinitions};
    use crate::escalation::{EscalationKind, EscalationTier};

    fn engine() -> ApprovalFlowEngine {
        let flows = ApprovalFlowCatalog {
            templates: vec![ApprovalFlowTemplate {
                flow_id: "two_step".to_string(),
                decision_type_ids: vec!["default".to_string()],
                stages: vec![
                    ApprovalStage::new("draft", &[], Some("manager")),
                    ApprovalStage::new("manager", &["Manager"], Some("exec")),
                    ApprovalStage::new("exec", &["A", "B"], None),
                ],
            }],
        };
        ApprovalFlowEngine::new(Arc::new(StaticDefinitions {
            raci: None,
            approval_flows: Some(Arc::new(flows)),
        }))
    }

    fn record_at(stage_id: &str) -> EscalationRecord {
        let mut record = EscalationRecord::new("a-1", EscalationTier::Staged, Utc::now());
        record.approval_flow_id = Some("two_step".to_string());
        record.current_stage_id = Some(stage_id.to_string());
        record
    }

    #[test]
    fn test_initialize_sets_flow_and_roles() {
        let record = EscalationRecord::new("a-1", EscalationTier::Staged, Utc::now());
        let responsibility = Responsibility {
            target_roles: vec!["CFO".to_string()],
            approval_flow_id: Some("two_step".to_string()),
        };

        let record = engine().initialize(record, &responsibility);
        assert_eq!(record.current_stage_id.as_deref(), Some("manager"));
        assert_eq!(record.target_roles, vec!["CFO"]);
    }

    #[test]
    fn test_initialize_keeps_question_audience() {
        let mut record = EscalationRecord::new("a-1", EscalationTier::Staged, Utc::now());
        record.kind = EscalationKind::Question;
        record.target_roles = vec!["Manager".to_string(), "Staff".to_string()];

        let record = engine().initialize(record, &Responsibility::default());
        assert_eq!(record.target_roles, vec!["Manager", "Staff"]);
        assert!(record.current_stage_id.is_none());
    }

    #[test]
    fn test_quorum_requires_every_approver() {
        let engine = engine();
        let record = record_at("exec");

        let first = engine.apply(record, "A", ApprovalDecision::Approve, Utc::now());
        assert_eq!(
            first.transition,
            Transition::Recorded {
                stage_id: "exec".to_string(),
                missing: vec!["B".to_string()],
            }
        );

        // Repeated approval is not counted twice.
        let again = engine.apply(first.record, "A", ApprovalDecision::Approve, Utc::now());
        assert!(!again.transition.changed());
        assert_eq!(again.record.approvals_for("exec").len(), 1);
        assert!(again.record.status.is_pending());

        let done = engine.apply(again.record, "B", ApprovalDecision::Approve, Utc::now());
        assert_eq!(done.transition, Transition::Approved);
        assert_eq!(done.record.status, EscalationStatus::Approved);
    }

    #[test]
    fn test_stage_advances_to_next() {
        let outcome = engine().apply(
            record_at("manager"),
            "Manager",
            ApprovalDecision::Approve,
            Utc::now(),
        );
        assert_eq!(
            outcome.transition,
            Transition::StageCompleted {
                from: "manager".to_string(),
                to: "exec".to_string(),
            }
        );
        assert_eq!(outcome.record.current_stage_id.as_deref(), Some("exec"));
        assert!(outcome.record.status.is_pending());
    }

    #[test]
    fn test_reject_is_terminal() {
        let engine = engine();
        let record = engine.record_approval(record_at("exec"), "A", ApprovalDecision::Approve);
        let record = engine.record_approval(record, "B", ApprovalDecision::Reject);
        assert_eq!(record.status, EscalationStatus::Rejected);

        let after = engine.apply(record.clone(), "B", ApprovalDecision::Approve, Utc::now());
        assert!(!after.transition.changed());
        assert_eq!(after.record.status, EscalationStatus::Rejected);
        assert_eq!(after.record.approvals_for("exec").len(), 1);
    }

    #[test]
    fn test_non_member_approval_is_ignored() {
        let outcome = engine().apply(
            record_at("exec"),
            "Manager",
            ApprovalDecision::Approve,
            Utc::now(),
        );
        assert!(!outcome.transition.changed());
        assert!(outcome.record.status.is_pending());
        assert!(outcome.record.stage_approvals.is_empty());
    }

    #[test]
    fn test_reject_from_any_stage() {
        let engine = engine();
        for (stage, role) in [("manager", "Manager"), ("exec", "B")] {
            let outcome = engine.apply(record_at(stage), role, ApprovalDecision::Reject, Utc::now());
            assert_eq!(outcome.transition, Transition::Rejected);
            assert_eq!(outcome.record.status, EscalationStatus::Rejected);
        }
    }

    #[test]
    fn test_non_member_reject_is_ignored() {
        let engine = engine();
        for (stage, role) in [("manager", "Staff"), ("exec", "Manager")] {
            let outcome = engine.apply(record_at(stage), role, ApprovalDecision::Reject, Utc::now());
            assert!(matches!(outcome.transition, Transition::Ignored { .. }));
            assert!(outcome.record.status.is_pending());
            assert_eq!(outcome.record.current_stage_id.as_deref(), Some(stage));
        }
    }

    #[test]
    fn test_unknown_flow_leaves_record_unchanged() {
        let mut record = record_at("exec");
        record.approval_flow_id = Some("missing".to_string());
        let outcome = engine().apply(record, "A", ApprovalDecision::Approve, Utc::now());
        assert!(matches!(outcome.transition, Transition::Ignored { .. }));

        let mut record = record_at("exec");
        record.approval_flow_id = None;
        let outcome = engine().apply(record, "A", ApprovalDecision::Reject, Utc::now());
        assert!(outcome.record.status.is_pending());
    }

    #[test]
    fn test_missing_current_stage_starts_at_initial() {
        let mut record = record_at("manager");
        record.current_stage_id = None;
        let outcome = engine().apply(record, "Manager", ApprovalDecision::Approve, Utc::now());
        assert_eq!(outcome.record.current_stage_id.as_deref(), Some("exec"));
    }
}
