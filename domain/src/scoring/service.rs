//! Importance / urgency scoring of a single finding

use crate::analysis::{Finding, PatternKind, QuantitativeSignals};
use crate::core::level::{Severity, Urgency, clamp_score};
use serde::{Deserialize, Serialize};

const DEFAULT_EXPLANATION: &str = "A structural decision-making issue was detected.";
const ESCALATION_DELAY_DEFAULT_SCORE: f64 = 65.0;
const GENERIC_DEFAULT_SCORE: f64 = 50.0;

/// Contribution of each signal, for explainability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantitativeBreakdown {
    pub downgrade_impact: u32,
    pub concentration_impact: u32,
    pub ignored_opposition_impact: u32,
}

/// Result of evaluating one finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvaluation {
    pub overall_score: u32,
    pub importance_score: u32,
    pub urgency_score: u32,
    pub severity: Severity,
    pub urgency: Urgency,
    pub reasons: Vec<String>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantitative_breakdown: Option<QuantitativeBreakdown>,
}

/// Maps one detected pattern and its signals to importance, urgency and an
/// overall score with human-readable reasons.
///
/// Stateless and infallible: missing signals read as zero.
///
/// # Example
///
/// ```
/// use arbiter_domain::analysis::Finding;
/// use arbiter_domain::core::level::{Severity, Urgency};
/// use arbiter_domain::scoring::ScoringService;
///
/// let finding = Finding::new("B1", "KPI worsening without strategy change")
///     .with_signal("kpi_downgrade_count", 2)
///     .with_signal("decision_concentration_rate", 0.75)
///     .with_signal("ignored_opposition_count", 1);
///
/// let evaluation = ScoringService::new().evaluate(&finding);
/// assert_eq!(evaluation.importance_score, 85);
/// assert_eq!(evaluation.urgency_score, 70);
/// assert_eq!(evaluation.overall_score, 79);
/// assert_eq!(evaluation.severity, Severity::High);
/// assert_eq!(evaluation.urgency, Urgency::Urgent);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringService;

impl ScoringService {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, finding: &Finding) -> ScoreEvaluation {
        match &finding.pattern {
            PatternKind::JustificationPhase => self.evaluate_justification_phase(finding),
            PatternKind::EscalationDelay => self.evaluate_escalation_delay(finding),
            PatternKind::Unknown(_) => self.evaluate_generic(finding),
        }
    }

    fn evaluate_justification_phase(&self, finding: &Finding) -> ScoreEvaluation {
        let signals = finding.signals();

        let importance_score = importance_tiers(&signals).min(100);
        let urgency_score = urgency_tiers(&signals).min(100);
        // round(0.6·importance + 0.4·urgency) in integer arithmetic
        let overall_score = ((6 * importance_score + 4 * urgency_score + 5) / 10).min(100);

        let mut reasons = Vec::new();
        if signals.downgrade_count >= 2 {
            reasons.push(format!(
                "KPIs were revised downward {} times in a row; the strategy needs reconsidering.",
                signals.downgrade_count
            ));
        }
        if signals.decision_concentration >= 0.7 {
            reasons.push(format!(
                "Decisions are concentrated in one person ({:.1}% of statements); decision-making lacks diversity.",
                signals.decision_concentration * 100.0
            ));
        }
        if signals.ignored_opposition_count >= 1 {
            reasons.push(format!(
                "{} opposing opinion(s) were ignored; the organisation is losing its ability to learn.",
                signals.ignored_opposition_count
            ));
        }

        let explanation = if reasons.is_empty() {
            DEFAULT_EXPLANATION.to_string()
        } else {
            reasons.join(" ")
        };

        ScoreEvaluation {
            overall_score,
            importance_score,
            urgency_score,
            severity: Severity::from_score(overall_score),
            urgency: Urgency::from_score(urgency_score),
            reasons,
            explanation,
            quantitative_breakdown: Some(QuantitativeBreakdown {
                downgrade_impact: signals.downgrade_count.saturating_mul(10),
                concentration_impact: (signals.decision_concentration * 30.0).floor() as u32,
                ignored_opposition_impact: signals.ignored_opposition_count.saturating_mul(10),
            }),
        }
    }

    fn evaluate_escalation_delay(&self, finding: &Finding) -> ScoreEvaluation {
        let score = clamp_score(finding.score.unwrap_or(ESCALATION_DELAY_DEFAULT_SCORE));
        let (severity, urgency) = match score {
            70.. => (Severity::High, Urgency::Urgent),
            40..=69 => (Severity::Medium, Urgency::High),
            _ => (Severity::Low, Urgency::Medium),
        };

        ScoreEvaluation {
            overall_score: score,
            importance_score: score,
            urgency_score: score,
            severity,
            urgency,
            reasons: vec!["A delay between recognising a risk and reporting it was detected.".to_string()],
            explanation: "Risks are recognised on the ground but have not been reported upward."
                .to_string(),
            quantitative_breakdown: None,
        }
    }

    fn evaluate_generic(&self, finding: &Finding) -> ScoreEvaluation {
        let score = clamp_score(finding.score.unwrap_or(GENERIC_DEFAULT_SCORE));
        let (severity, urgency) = match score {
            70.. => (Severity::High, Urgency::High),
            40..=69 => (Severity::Medium, Urgency::Medium),
            _ => (Severity::Low, Urgency::Low),
        };

        let description = if finding.description.trim().is_empty() {
            DEFAULT_EXPLANATION.to_string()
        } else {
            finding.description.clone()
        };

        ScoreEvaluation {
            overall_score: score,
            importance_score: score,
            urgency_score: score,
            severity,
            urgency,
            reasons: vec![description.clone()],
            explanation: description,
            quantitative_breakdown: None,
        }
    }
}

fn importance_tiers(signals: &QuantitativeSignals) -> u32 {
    let downgrades = match signals.downgrade_count {
        3.. => 50,
        2 => 40,
        1 => 25,
        0 => 0,
    };
    let concentration = match signals.decision_concentration {
        r if r >= 0.8 => 35,
        r if r >= 0.7 => 30,
        r if r >= 0.5 => 15,
        _ => 0,
    };
    let opposition = match signals.ignored_opposition_count {
        2.. => 25,
        1 => 15,
        0 => 0,
    };
    downgrades + concentration + opposition
}

fn urgency_tiers(signals: &QuantitativeSignals) -> u32 {
    let downgrades = match signals.downgrade_count {
        3.. => 40,
        2 => 25,
        _ => 0,
    };
    let concentration = match signals.decision_concentration {
        r if r >= 0.8 => 40,
        r if r >= 0.7 => 30,
        _ => 0,
    };
    let opposition = match signals.ignored_opposition_count {
        2.. => 25,
        1 => 15,
        0 => 0,
    };
    downgrades + concentration + opposition
}
