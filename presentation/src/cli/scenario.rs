//! Scenario files for `arbiter run`

use arbiter_application::AssessAnalysisInput;
use arbiter_domain::{ApprovalDecision, EvidenceSources};
use serde::{Deserialize, Serialize};

/// One scripted approval decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedDecision {
    pub role_id: String,
    pub decision: ApprovalDecision,
    /// Audit user; defaults to the role id
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Input to `arbiter run`.
///
/// ```json
/// {
///   "analysis_id": "weekly-sync-0412",
///   "findings": [{"pattern_id": "B1_justification_phase", "quantitative_scores": {}}],
///   "role_assessments": [{"role_id": "executive", "weight": 1.0, "overall_score": 80}],
///   "evidence": {"transcript": "[10:00:01] alice: we keep the plan", "messages": []},
///   "approvals": [{"role_id": "Manager", "decision": "approve"}]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub analysis_id: Option<String>,
    #[serde(flatten)]
    pub assessment: AssessAnalysisInput,
    pub evidence: Option<EvidenceSources>,
    pub approvals: Vec<ScriptedDecision>,
    /// Audit identity of whoever raises the escalation
    pub raised_by: Option<String>,
}

impl Scenario {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_json(
            r#"{
                "analysis_id": "a-1",
                "findings": [{"pattern_id": "ES1_escalation_delay", "score": 80}],
                "role_assessments": [{"role_id": "executive", "weight": 1.0, "overall_score": 75}],
                "approvals": [
                    {"role_id": "Manager", "decision": "approve"},
                    {"role_id": "CEO", "decision": "reject", "user_id": "ceo-1"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.analysis_id.as_deref(), Some("a-1"));
        assert_eq!(scenario.assessment.findings.len(), 1);
        assert_eq!(scenario.assessment.roles.len(), 1);
        assert_eq!(scenario.approvals[1].decision, ApprovalDecision::Reject);
        assert_eq!(scenario.approvals[1].user_id.as_deref(), Some("ceo-1"));
        assert!(scenario.evidence.is_none());
    }

    #[test]
    fn test_empty_scenario() {
        let scenario = Scenario::from_json("{}").unwrap();
        assert!(scenario.assessment.findings.is_empty());
        assert!(scenario.approvals.is_empty());
    }
}
