//! Escalation record
//!
//! Created once when an analysis crosses the escalation threshold. After
//! creation only the approval flow mutates it, and only until it reaches a
//! terminal status.

use super::stage::EscalationStage;
use crate::core::level::{Severity, Urgency};
use crate::scoring::{ClarifyingQuestion, ConfidenceLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Lifecycle status. Moves `pending → approved | rejected` and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl EscalationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, EscalationStatus::Pending)
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, EscalationStatus::Approved)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, EscalationStatus::Rejected)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl fmt::Display for EscalationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationStatus::Pending => write!(f, "pending"),
            EscalationStatus::Approved => write!(f, "approved"),
            EscalationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Whether the record asserts a finding or asks about it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationKind {
    #[default]
    Notice,
    Question,
}

/// Which rung of the fallback ladder produced the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationTier {
    #[default]
    Staged,
    Legacy,
    Minimal,
}

impl fmt::Display for EscalationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationTier::Staged => write!(f, "staged"),
            EscalationTier::Legacy => write!(f, "legacy"),
            EscalationTier::Minimal => write!(f, "minimal"),
        }
    }
}

/// One role's approval of one approval-flow stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageApproval {
    pub role_id: String,
    pub approved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationRecord {
    pub escalation_id: String,
    pub analysis_id: String,
    #[serde(rename = "type")]
    pub kind: EscalationKind,
    pub tier: EscalationTier,
    pub stage: Option<EscalationStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
    pub target_roles: Vec<String>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub severity: Severity,
    pub urgency: Urgency,
    pub score: u32,
    pub action_required: bool,
    pub approval_flow_id: Option<String>,
    pub current_stage_id: Option<String>,
    /// Approvals recorded per approval-flow stage id
    #[serde(default)]
    pub stage_approvals: BTreeMap<String, Vec<StageApproval>>,
    pub status: EscalationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<ClarifyingQuestion>,
    /// Why a lower fallback tier had to produce this record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EscalationRecord {
    /// A pending record with a fresh id and no approval flow assigned yet.
    pub fn new(analysis_id: impl Into<String>, tier: EscalationTier, now: DateTime<Utc>) -> Self {
        Self {
            escalation_id: Uuid::new_v4().to_string(),
            analysis_id: analysis_id.into(),
            kind: EscalationKind::Notice,
            tier,
            stage: None,
            stage_name: None,
            target_roles: Vec::new(),
            reason: String::new(),
            description: None,
            severity: Severity::default(),
            urgency: Urgency::default(),
            score: 0,
            action_required: true,
            approval_flow_id: None,
            current_stage_id: None,
            stage_approvals: BTreeMap::new(),
            status: EscalationStatus::Pending,
            confidence: None,
            confidence_level: None,
            question: None,
            degraded_reason: None,
            created_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_question(&self) -> bool {
        self.kind == EscalationKind::Question
    }

    pub fn approvals_for(&self, stage_id: &str) -> &[StageApproval] {
        self.stage_approvals
            .get(stage_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_approved(&self, stage_id: &str, role_id: &str) -> bool {
        self.approvals_for(stage_id)
            .iter()
            .any(|a| a.role_id == role_id)
    }
}
