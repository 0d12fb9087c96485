//! Decision-making anti-pattern identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// A detected anti-pattern, dispatched on by scoring, question generation
/// and responsibility resolution.
///
/// Upstream producers tag findings with a `pattern_id` string whose leading
/// code (the text before the first `_`) identifies the pattern; the rest is
/// a free-form label. Anything unrecognised is kept verbatim in
/// [`PatternKind::Unknown`].
///
/// # Example
///
/// ```
/// use arbiter_domain::analysis::PatternKind;
///
/// assert_eq!(PatternKind::from_id("B1_justification"), PatternKind::JustificationPhase);
/// assert_eq!(PatternKind::from_id("es1"), PatternKind::EscalationDelay);
/// assert_eq!(
///     PatternKind::from_id("X9_other"),
///     PatternKind::Unknown("X9_other".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PatternKind {
    /// KPIs keep being revised downward while the plan is defended rather
    /// than reconsidered.
    JustificationPhase,
    /// Risks are known on the floor but not reported upward.
    EscalationDelay,
    Unknown(String),
}

impl PatternKind {
    pub fn from_id(id: &str) -> Self {
        let code = id.split('_').next().unwrap_or(id).trim();
        match code.to_ascii_uppercase().as_str() {
            "B1" => PatternKind::JustificationPhase,
            "ES1" => PatternKind::EscalationDelay,
            _ => PatternKind::Unknown(id.to_string()),
        }
    }

    /// Canonical identifier, used as the debounce key and in records.
    pub fn id(&self) -> &str {
        match self {
            PatternKind::JustificationPhase => "B1_justification_phase",
            PatternKind::EscalationDelay => "ES1_escalation_delay",
            PatternKind::Unknown(id) => id,
        }
    }

    /// Short human-readable name for reasons and questions.
    pub fn label(&self) -> &str {
        match self {
            PatternKind::JustificationPhase => "justification phase",
            PatternKind::EscalationDelay => "escalation delay",
            PatternKind::Unknown(id) => id,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PatternKind::Unknown(_))
    }

    /// Whether a definition-table key (e.g. a RACI `decision_type_id`)
    /// refers to this pattern.
    pub fn matches_id(&self, id: &str) -> bool {
        match self {
            PatternKind::Unknown(own) => own == id,
            known => PatternKind::from_id(id) == *known,
        }
    }
}

impl Default for PatternKind {
    fn default() -> Self {
        PatternKind::Unknown(String::new())
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl From<String> for PatternKind {
    fn from(id: String) -> Self {
        PatternKind::from_id(&id)
    }
}

impl From<&str> for PatternKind {
    fn from(id: &str) -> Self {
        PatternKind::from_id(id)
    }
}

impl From<PatternKind> for String {
    fn from(kind: PatternKind) -> Self {
        kind.id().to_string()
    }
}
