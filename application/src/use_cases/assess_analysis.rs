//! Assess Analysis use case
//!
//! Scores every finding, aggregates the rule-based baseline, then blends in
//! the role assessments through the ensemble.

use arbiter_domain::{
    AnalysisResult, EnsembleScoringService, Finding, RoleAssessment, ScoreEvaluation,
    ScoringService, Severity, Urgency,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Findings from the analysis producer plus any role assessments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessAnalysisInput {
    pub findings: Vec<Finding>,
    #[serde(alias = "role_assessments")]
    pub roles: Vec<RoleAssessment>,
}

impl AssessAnalysisInput {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            roles: Vec::new(),
        }
    }

    pub fn with_roles(mut self, roles: Vec<RoleAssessment>) -> Self {
        self.roles = roles;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssessAnalysisUseCase {
    scoring: ScoringService,
    ensemble: EnsembleScoringService,
}

impl AssessAnalysisUseCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute(&self, input: AssessAnalysisInput) -> AnalysisResult {
        let baseline = self.rule_baseline(input.findings);
        let result = self.ensemble.combine(&baseline, &input.roles);
        info!(
            findings = result.findings.len(),
            roles = input.roles.len(),
            score = result.overall_score,
            severity = %result.severity,
            "Analysis assessed"
        );
        result
    }

    /// Highest finding score, severity banded then raised to the worst finding.
    pub fn rule_baseline(&self, findings: Vec<Finding>) -> AnalysisResult {
        let evaluations: Vec<ScoreEvaluation> =
            findings.iter().map(|f| self.scoring.evaluate(f)).collect();

        let overall_score = evaluations
            .iter()
            .map(|e| e.overall_score)
            .max()
            .unwrap_or(0);
        let severity = evaluations
            .iter()
            .map(|e| e.severity)
            .fold(baseline_severity(overall_score), std::cmp::max);
        let urgency = evaluations
            .iter()
            .map(|e| e.urgency)
            .max()
            .unwrap_or(Urgency::Low);

        let mut reasons: Vec<String> = Vec::new();
        for reason in evaluations.iter().flat_map(|e| e.reasons.iter()) {
            if !reasons.contains(reason) {
                reasons.push(reason.clone());
            }
        }

        let explanation = if findings.is_empty() {
            "No decision-making anti-patterns detected.".to_string()
        } else {
            let labels: Vec<&str> = findings.iter().map(|f| f.pattern.label()).collect();
            format!(
                "{} finding(s) detected: {}.",
                findings.len(),
                labels.join(", ")
            )
        };

        debug!(overall_score, %severity, %urgency, "Rule baseline computed");

        AnalysisResult {
            findings,
            overall_score,
            severity,
            urgency,
            explanation,
            reasons,
            rule_score: Some(f64::from(overall_score)),
            llm_score: None,
            contributing_roles: Vec::new(),
        }
    }
}

fn baseline_severity(score: u32) -> Severity {
    match score {
        70.. => Severity::High,
        40.. => Severity::Medium,
        _ => Severity::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b1(downgrades: u32, concentration: f64, ignored: u32) -> Finding {
        Finding::new("B1_justification_phase", "plan kept despite KPI misses")
            .with_signal("kpi_downgrade_count", downgrades)
            .with_signal("decision_concentration_rate", concentration)
            .with_signal("ignored_opposition_count", ignored)
    }

    #[test]
    fn test_no_findings() {
        let result = AssessAnalysisUseCase::new().execute(AssessAnalysisInput::default());
        assert_eq!(result.overall_score, 0);
        assert_eq!(result.severity, Severity::Low);
        assert_eq!(result.rule_score, Some(0.0));
        assert!(!result.has_findings());
    }

    #[test]
    fn test_baseline_takes_highest_finding() {
        let use_case = AssessAnalysisUseCase::new();
        let strong = use_case.scoring.evaluate(&b1(3, 0.85, 2));
        let result = use_case.rule_baseline(vec![
            Finding::new("X9_other", "minor").with_score(20.0),
            b1(3, 0.85, 2),
        ]);

        assert_eq!(result.overall_score, strong.overall_score);
        assert!(result.severity >= strong.severity);
        assert_eq!(result.urgency, strong.urgency);
        assert!(result.explanation.starts_with("2 finding(s) detected"));
    }

    #[test]
    fn test_severity_never_below_worst_finding() {
        let finding = Finding::new("ES1_escalation_delay", "risk not reported").with_score(75.0);
        let evaluation = ScoringService::new().evaluate(&finding);
        let result = AssessAnalysisUseCase::new().rule_baseline(vec![finding]);
        assert!(result.severity >= evaluation.severity);
    }

    #[test]
    fn test_roles_are_blended() {
        let input = AssessAnalysisInput::new(vec![b1(2, 0.7, 1)]).with_roles(vec![
            RoleAssessment::new("executive", 1.0, 90.0)
                .with_levels(Severity::Critical, Urgency::Immediate)
                .with_explanation("Strategy needs review"),
        ]);
        let result = AssessAnalysisUseCase::new().execute(input);

        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.urgency, Urgency::Immediate);
        assert_eq!(result.llm_score, Some(90.0));
        assert!(result.explanation.contains("[executive]"));
    }

    #[test]
    fn test_input_from_json() {
        let input: AssessAnalysisInput = serde_json::from_str(
            r#"{
                "findings": [{"pattern_id": "B1_justification_phase", "severity": "HIGH"}],
                "role_assessments": [{"role_id": "executive", "weight": 1.0, "overall_score": 80}]
            }"#,
        )
        .unwrap();
        assert_eq!(input.findings.len(), 1);
        assert_eq!(input.roles.len(), 1);
    }
}
