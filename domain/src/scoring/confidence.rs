//! Agreement-based confidence and clarifying questions
//!
//! When the rule engine and the LLM roles disagree, a strong claim is
//! degraded to a question addressed to non-executive roles instead of being
//! asserted or dropped.

use crate::analysis::{AnalysisResult, PatternKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalisation divisor for the variance of role scores.
const VARIANCE_DIVISOR: f64 = 100.0;
/// Upper bound of the variance penalty.
const MAX_VARIANCE_PENALTY: f64 = 0.3;

const HIGH_THRESHOLD: f64 = 0.8;
const MEDIUM_THRESHOLD: f64 = 0.6;

const QUESTION_MESSAGE: &str = "A structural issue may be present, but confidence is low. Please confirm the following:";
const NO_FINDINGS_MESSAGE: &str =
    "A structural issue may be present, but confidence is low. Please take a look.";

/// Roles that receive clarifying questions. Executives are never asked.
pub const QUESTION_TARGET_ROLES: [&str; 2] = ["Manager", "Staff"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if confidence >= MEDIUM_THRESHOLD {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A question routed to non-executive roles in place of an assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub message: String,
    pub questions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_id: Option<PatternKind>,
    pub target_roles: Vec<String>,
}

/// Measures rule/LLM agreement and decides whether to ask instead of assert.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceBasedEscalation;

impl ConfidenceBasedEscalation {
    pub fn new() -> Self {
        Self
    }

    /// `1 − |rule − llm| / max(rule, llm, 1)`, reduced by up to 30% when the
    /// individual role scores disagree. Always within `0.0..=1.0`; `0.0` when
    /// both scores are zero.
    pub fn calculate_confidence(&self, analysis: &AnalysisResult) -> f64 {
        let rule_score = sanitize(analysis.rule_score.unwrap_or(0.0));
        let llm_score = sanitize(analysis.llm_score.unwrap_or(0.0));

        if rule_score == 0.0 && llm_score == 0.0 {
            return 0.0;
        }

        let max_score = rule_score.max(llm_score).max(1.0);
        let mut confidence = 1.0 - (rule_score - llm_score).abs() / max_score;

        let role_scores: Vec<f64> = analysis
            .contributing_roles
            .iter()
            .map(|r| r.effective_score())
            .collect();
        if !role_scores.is_empty() {
            let penalty = (variance(&role_scores) / VARIANCE_DIVISOR).min(MAX_VARIANCE_PENALTY);
            confidence *= 1.0 - penalty;
        }

        confidence.clamp(0.0, 1.0)
    }

    pub fn confidence_level(&self, analysis: &AnalysisResult) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.calculate_confidence(analysis))
    }

    pub fn should_ask_question(&self, analysis: &AnalysisResult) -> bool {
        self.confidence_level(analysis) == ConfidenceLevel::Low
    }

    pub fn generate_question(&self, analysis: &AnalysisResult) -> ClarifyingQuestion {
        let confidence = self.calculate_confidence(analysis);
        let confidence_level = ConfidenceLevel::from_confidence(confidence);
        let target_roles = QUESTION_TARGET_ROLES.iter().map(|r| r.to_string()).collect();

        let Some(finding) = analysis.findings.first() else {
            return ClarifyingQuestion {
                confidence,
                confidence_level,
                message: NO_FINDINGS_MESSAGE.to_string(),
                questions: Vec::new(),
                pattern_id: None,
                target_roles,
            };
        };

        let mut questions: Vec<String> = match &finding.pattern {
            PatternKind::JustificationPhase => vec![
                "KPIs keep being revised downward. Has a change of strategy been discussed?".to_string(),
                "Have exit or pivot options been considered?".to_string(),
            ],
            PatternKind::EscalationDelay => vec![
                "Risks have been recognised. Have they been reported to management?".to_string(),
                "Does the situation require escalation?".to_string(),
            ],
            PatternKind::Unknown(_) => {
                vec!["A structural issue may be present. Please confirm.".to_string()]
            }
        };

        if !finding.evidence.is_empty() {
            let cited: Vec<&str> = finding.evidence.iter().take(3).map(String::as_str).collect();
            questions.push(format!(
                "Please confirm the following evidence: {}",
                cited.join(", ")
            ));
        }

        ClarifyingQuestion {
            confidence,
            confidence_level,
            message: QUESTION_MESSAGE.to_string(),
            questions,
            pattern_id: Some(finding.pattern.clone()),
            target_roles,
        }
    }
}

fn sanitize(score: f64) -> f64 {
    if score.is_finite() { score.max(0.0) } else { 0.0 }
}

/// Population variance.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Finding, RoleAssessment};

    fn analysis(rule: f64, llm: Option<f64>, role_scores: &[f64]) -> AnalysisResult {
        AnalysisResult {
            rule_score: Some(rule),
            llm_score: llm,
            contributing_roles: role_scores
                .iter()
                .map(|s| RoleAssessment::new("role", 1.0, *s))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_scores_give_zero_confidence() {
        let engine = ConfidenceBasedEscalation::new();
        let confidence = engine.calculate_confidence(&analysis(0.0, Some(0.0), &[]));
        assert_eq!(confidence, 0.0);
        assert!(!confidence.is_nan());
    }

    #[test]
    fn test_full_agreement() {
        let engine = ConfidenceBasedEscalation::new();
        let confidence = engine.calculate_confidence(&analysis(75.0, Some(75.0), &[75.0, 75.0]));
        assert_eq!(confidence, 1.0);
        assert_eq!(
            ConfidenceLevel::from_confidence(confidence),
            ConfidenceLevel::High
        );
    }

    #[test]
    fn test_variance_penalty_is_capped() {
        let engine = ConfidenceBasedEscalation::new();
        // base = 1 - 5/80 = 0.9375; variance of [70, 90] = 100 → penalty capped at 0.3
        let confidence = engine.calculate_confidence(&analysis(75.0, Some(80.0), &[70.0, 90.0]));
        assert!((confidence - 0.9375 * 0.7).abs() < 1e-9);
        assert_eq!(
            ConfidenceLevel::from_confidence(confidence),
            ConfidenceLevel::Medium
        );
    }

    #[test]
    fn test_small_variance_penalty() {
        let engine = ConfidenceBasedEscalation::new();
        // variance of [78, 82] = 4 → penalty 0.04
        let confidence = engine.calculate_confidence(&analysis(80.0, Some(80.0), &[78.0, 82.0]));
        assert!((confidence - 0.96).abs() < 1e-9);
    }

    #[test]
    fn test_rule_only_analysis_has_low_confidence() {
        let engine = ConfidenceBasedEscalation::new();
        let rule_only = analysis(75.0, None, &[]);
        assert_eq!(engine.calculate_confidence(&rule_only), 0.0);
        assert!(engine.should_ask_question(&rule_only));
    }

    #[test]
    fn test_confidence_always_in_unit_range() {
        let engine = ConfidenceBasedEscalation::new();
        let cases = [
            analysis(100.0, Some(0.0), &[0.0, 100.0]),
            analysis(-20.0, Some(500.0), &[]),
            analysis(f64::NAN, Some(50.0), &[f64::NAN]),
            analysis(0.5, Some(0.0), &[]),
        ];
        for case in &cases {
            let confidence = engine.calculate_confidence(case);
            assert!((0.0..=1.0).contains(&confidence), "{}", confidence);
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(ConfidenceLevel::from_confidence(0.8), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_confidence(0.79), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_confidence(0.6), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_confidence(0.59), ConfidenceLevel::Low);
    }

    #[test]
    fn test_should_ask_question_only_when_low() {
        let engine = ConfidenceBasedEscalation::new();
        assert!(!engine.should_ask_question(&analysis(75.0, Some(80.0), &[70.0, 90.0])));
        assert!(engine.should_ask_question(&analysis(90.0, Some(20.0), &[])));
    }

    #[test]
    fn test_generate_question_without_findings() {
        let question =
            ConfidenceBasedEscalation::new().generate_question(&analysis(90.0, Some(20.0), &[]));
        assert!(question.questions.is_empty());
        assert_eq!(question.message, NO_FINDINGS_MESSAGE);
        assert!(question.pattern_id.is_none());
    }

    #[test]
    fn test_generate_question_for_justification_phase() {
        let mut input = analysis(90.0, Some(20.0), &[]);
        input.findings.push(
            Finding::new("B1", "KPI slipping")
                .with_evidence("Q1 target missed")
                .with_evidence("Q2 target missed")
                .with_evidence("Q3 target missed")
                .with_evidence("Q4 target missed"),
        );

        let question = ConfidenceBasedEscalation::new().generate_question(&input);
        assert_eq!(question.questions.len(), 3);
        assert!(question.questions[0].contains("change of strategy"));
        assert!(question.questions[2].contains("Q3 target missed"));
        assert!(!question.questions[2].contains("Q4"));
        assert_eq!(question.pattern_id, Some(PatternKind::JustificationPhase));
        assert_eq!(question.confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_generate_question_never_targets_executives() {
        let mut input = analysis(90.0, Some(20.0), &[]);
        input.findings.push(Finding::new("ES1", "delay"));

        let question = ConfidenceBasedEscalation::new().generate_question(&input);
        assert_eq!(question.target_roles, vec!["Manager", "Staff"]);
        assert!(question.questions[0].contains("reported to management"));
        assert_eq!(question.questions.len(), 2);
    }

    #[test]
    fn test_generate_question_for_unknown_pattern() {
        let mut input = analysis(90.0, Some(20.0), &[]);
        input.findings.push(Finding::new("custom", "other"));

        let question = ConfidenceBasedEscalation::new().generate_question(&input);
        assert_eq!(question.questions.len(), 1);
    }
}
