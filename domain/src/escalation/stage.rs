//! Escalation stages

use crate::analysis::PatternKind;
use crate::core::error::DomainError;
use crate::core::level::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Escalation tier, ordered from least to most intrusive
///
/// # Example
///
/// ```
/// use arbiter_domain::core::level::Severity;
/// use arbiter_domain::escalation::EscalationStage;
///
/// assert_eq!(EscalationStage::determine(65, Severity::Low), Some(EscalationStage::Review));
/// // severity raises the stage, never lowers it
/// assert_eq!(EscalationStage::determine(10, Severity::Critical), Some(EscalationStage::ForcedAgenda));
/// assert_eq!(EscalationStage::determine(81, Severity::Low), Some(EscalationStage::ForcedAgenda));
/// assert_eq!(EscalationStage::determine(49, Severity::Medium), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationStage {
    /// Signs detected; keep watching
    Notification,
    /// Likely issue; a manager should review
    Review,
    /// Issue detected; executive approval required
    ApprovalRequest,
    /// Urgent; must be on the next meeting's agenda
    ForcedAgenda,
}

/// Audience and wording of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    pub stage: EscalationStage,
    pub name: &'static str,
    pub description: &'static str,
    pub action_required: bool,
    pub target_roles: &'static [&'static str],
}

impl StageDescriptor {
    pub fn target_roles(&self) -> Vec<String> {
        self.target_roles.iter().map(|r| r.to_string()).collect()
    }
}

impl EscalationStage {
    pub const ALL: [EscalationStage; 4] = [
        EscalationStage::Notification,
        EscalationStage::Review,
        EscalationStage::ApprovalRequest,
        EscalationStage::ForcedAgenda,
    ];

    /// Map a score and severity to a stage.
    ///
    /// Score bands: `[50,60)` notification, `[60,70)` review, `[70,80)`
    /// approval request, `≥80` forced agenda. CRITICAL forces the forced
    /// agenda and HIGH at least an approval request. Below 50 with a
    /// non-elevating severity there is no stage.
    pub fn determine(score: u32, severity: Severity) -> Option<Self> {
        if score >= 80 || severity == Severity::Critical {
            Some(EscalationStage::ForcedAgenda)
        } else if score >= 70 || severity == Severity::High {
            Some(EscalationStage::ApprovalRequest)
        } else if score >= 60 {
            Some(EscalationStage::Review)
        } else if score >= 50 {
            Some(EscalationStage::Notification)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationStage::Notification => "notification",
            EscalationStage::Review => "review",
            EscalationStage::ApprovalRequest => "approval_request",
            EscalationStage::ForcedAgenda => "forced_agenda",
        }
    }

    pub fn descriptor(&self) -> StageDescriptor {
        match self {
            EscalationStage::Notification => StageDescriptor {
                stage: *self,
                name: "Notification",
                description: "Signs of a structural issue were detected. Monitoring continues.",
                action_required: false,
                target_roles: &["Manager", "Staff"],
            },
            EscalationStage::Review => StageDescriptor {
                stage: *self,
                name: "Review",
                description: "A structural issue is likely. Please review.",
                action_required: true,
                target_roles: &["Manager"],
            },
            EscalationStage::ApprovalRequest => StageDescriptor {
                stage: *self,
                name: "Approval request",
                description: "A structural issue was detected. Approval is requested.",
                action_required: true,
                target_roles: &["Executive"],
            },
            EscalationStage::ForcedAgenda => StageDescriptor {
                stage: *self,
                name: "Forced agenda",
                description: "An urgent structural issue was detected. It must be discussed at the next meeting.",
                action_required: true,
                target_roles: &["Executive"],
            },
        }
    }
}

impl fmt::Display for EscalationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EscalationStage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| DomainError::InvalidStage(s.to_string()))
    }
}

/// Sentence naming what was detected, shared by every reason generator.
pub(crate) fn detection_sentence(pattern: Option<&PatternKind>) -> &'static str {
    match pattern {
        Some(PatternKind::JustificationPhase) => "Signs of a justification phase were detected.",
        Some(PatternKind::EscalationDelay) => "An escalation delay was detected.",
        _ => "A structural issue was detected.",
    }
}
