//! Stage quorum
//!
//! A stage completes once every role in its approver set has approved.

use super::definitions::ApprovalStage;
use crate::escalation::EscalationRecord;

/// Approval state of one stage for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageQuorum<'a> {
    stage: &'a ApprovalStage,
    approved: Vec<&'a str>,
}

impl<'a> StageQuorum<'a> {
    pub fn of(stage: &'a ApprovalStage, record: &'a EscalationRecord) -> Self {
        let approved = record
            .approvals_for(&stage.stage_id)
            .iter()
            .map(|a| a.role_id.as_str())
            .collect();
        Self { stage, approved }
    }

    /// Roles in the approver set that have not approved yet.
    pub fn missing(&self) -> Vec<&'a str> {
        self.stage
            .approver_role_ids
            .iter()
            .map(String::as_str)
            .filter(|role| !self.approved.contains(role))
            .collect()
    }

    /// Recorded approvals cover the whole approver set.
    ///
    /// A stage with an empty approver set is never satisfied: nobody is
    /// allowed to approve it.
    pub fn is_satisfied(&self) -> bool {
        !self.stage.approver_role_ids.is_empty() && self.missing().is_empty()
    }

    pub fn approvals(&self) -> usize {
        self.approved.len()
    }

    pub fn required(&self) -> usize {
        self.stage.approver_role_ids.len()
    }

    pub fn description(&self) -> String {
        format!(
            "{}: {}/{} approvals",
            self.stage.stage_id,
            self.approvals().min(self.required()),
            self.required()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escalation::{EscalationTier, StageApproval};
    use chrono::Utc;

    fn record_with(stage_id: &str, roles: &[&str]) -> EscalationRecord {
        let now = Utc::now();
        let mut record = EscalationRecord::new("a-1", EscalationTier::Staged, now);
        record.stage_approvals.insert(
            stage_id.to_string(),
            roles
                .iter()
                .map(|r| StageApproval {
                    role_id: r.to_string(),
                    approved_at: now,
                })
                .collect(),
        );
        record
    }

    #[test]
    fn test_partial_quorum() {
        let stage = ApprovalStage::new("exec", &["CEO", "CFO"], None);
        let record = record_with("exec", &["CEO"]);
        let quorum = StageQuorum::of(&stage, &record);

        assert!(!quorum.is_satisfied());
        assert_eq!(quorum.missing(), vec!["CFO"]);
        assert_eq!(quorum.description(), "exec: 1/2 approvals");
    }

    #[test]
    fn test_full_quorum() {
        let stage = ApprovalStage::new("exec", &["CEO", "CFO"], None);
        let record = record_with("exec", &["CFO", "CEO"]);
        assert!(StageQuorum::of(&stage, &record).is_satisfied());
    }

    #[test]
    fn test_empty_approver_set_never_satisfied() {
        let stage = ApprovalStage::new("draft", &[], Some("exec"));
        let record = record_with("draft", &[]);
        assert!(!StageQuorum::of(&stage, &record).is_satisfied());
    }
}
