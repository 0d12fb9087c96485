//! RACI and approval-flow definitions
//!
//! Both tables come from an external definition provider. A missing table
//! is not an error: resolution falls back to defaults.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decision type used when no entry matches the pattern
pub const DEFAULT_DECISION_TYPE: &str = "default";
/// `next` value (besides `None`) that marks the end of a flow
pub const APPROVED_STAGE_ID: &str = "approved";
/// Conventional name of a non-approvable first stage
pub const DRAFT_STAGE_ID: &str = "draft";

/// One row of the RACI table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionType {
    pub decision_type_id: String,
    #[serde(rename = "R")]
    pub responsible: Vec<String>,
    #[serde(rename = "A", skip_serializing_if = "Vec::is_empty")]
    pub accountable: Vec<String>,
    #[serde(rename = "C", skip_serializing_if = "Vec::is_empty")]
    pub consulted: Vec<String>,
    #[serde(rename = "I", skip_serializing_if = "Vec::is_empty")]
    pub informed: Vec<String>,
}

impl DecisionType {
    pub fn new(decision_type_id: impl Into<String>, responsible: &[&str]) -> Self {
        Self {
            decision_type_id: decision_type_id.into(),
            responsible: responsible.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaciMatrix {
    pub decision_types: Vec<DecisionType>,
}

/// One stage of an approval flow; `next` links to the following stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalStage {
    pub stage_id: String,
    pub approver_role_ids: Vec<String>,
    pub next: Option<String>,
}

impl ApprovalStage {
    pub fn new(stage_id: impl Into<String>, approvers: &[&str], next: Option<&str>) -> Self {
        Self {
            stage_id: stage_id.into(),
            approver_role_ids: approvers.iter().map(|r| r.to_string()).collect(),
            next: next.map(str::to_string),
        }
    }

    /// Whether completing this stage ends the flow.
    pub fn is_final(&self) -> bool {
        self.next
            .as_deref()
            .is_none_or(|next| next == APPROVED_STAGE_ID)
    }

    pub fn is_approver(&self, role_id: &str) -> bool {
        self.approver_role_ids.iter().any(|r| r == role_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalFlowTemplate {
    pub flow_id: String,
    pub decision_type_ids: Vec<String>,
    pub stages: Vec<ApprovalStage>,
}

impl ApprovalFlowTemplate {
    pub fn stage(&self, stage_id: &str) -> Option<&ApprovalStage> {
        self.stages.iter().find(|s| s.stage_id == stage_id)
    }

    /// First stage that needs approvals: the successor of a `draft` stage if
    /// there is one, otherwise the first listed stage. `None` when the
    /// template has nothing to approve.
    pub fn initial_stage_id(&self) -> Option<&str> {
        let initial = match self.stage(DRAFT_STAGE_ID) {
            Some(draft) => draft.next.as_deref(),
            None => self.stages.first().map(|s| s.stage_id.as_str()),
        };
        initial.filter(|id| *id != APPROVED_STAGE_ID)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalFlowCatalog {
    pub templates: Vec<ApprovalFlowTemplate>,
}

impl ApprovalFlowCatalog {
    pub fn template(&self, flow_id: &str) -> Option<&ApprovalFlowTemplate> {
        self.templates.iter().find(|t| t.flow_id == flow_id)
    }
}

/// Supplies the RACI and approval-flow tables.
///
/// Returning `None` means the table is unavailable; callers fall back to
/// defaults. Tables are shared, not copied per lookup.
pub trait DefinitionSource: Send + Sync {
    fn raci(&self) -> Option<Arc<RaciMatrix>>;

    fn approval_flows(&self) -> Option<Arc<ApprovalFlowCatalog>>;
}

/// In-memory definitions
#[derive(Debug, Clone, Default)]
pub struct StaticDefinitions {
    pub raci: Option<Arc<RaciMatrix>>,
    pub approval_flows: Option<Arc<ApprovalFlowCatalog>>,
}

impl StaticDefinitions {
    pub fn new(raci: RaciMatrix, approval_flows: ApprovalFlowCatalog) -> Self {
        Self {
            raci: Some(Arc::new(raci)),
            approval_flows: Some(Arc::new(approval_flows)),
        }
    }
}

impl DefinitionSource for StaticDefinitions {
    fn raci(&self) -> Option<Arc<RaciMatrix>> {
        self.raci.clone()
    }

    fn approval_flows(&self) -> Option<Arc<ApprovalFlowCatalog>> {
        self.approval_flows.clone()
    }
}
