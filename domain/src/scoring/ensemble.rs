//! Rule / LLM-role ensemble
//!
//! The rule baseline dominates (60/40) and severity / urgency are merged
//! with an ordinal maximum, so the ensemble can raise but never lower the
//! rule result.

use crate::analysis::{AnalysisResult, RoleAssessment};
use crate::core::level::clamp_score;
use tracing::debug;

/// Roles whose explanations are carried into the combined explanation.
pub const GOVERNANCE_ROLES: [&str; 2] = ["executive", "corp_planning"];

/// Combines one rule-based result with N weighted LLM-role results.
///
/// # Example
///
/// ```
/// use arbiter_domain::analysis::{AnalysisResult, RoleAssessment};
/// use arbiter_domain::scoring::EnsembleScoringService;
///
/// let rule = AnalysisResult { overall_score: 75, ..Default::default() };
/// let roles = vec![
///     RoleAssessment::new("executive", 0.5, 70.0),
///     RoleAssessment::new("staff", 0.5, 90.0),
/// ];
///
/// let combined = EnsembleScoringService::new().combine(&rule, &roles);
/// assert_eq!(combined.llm_score, Some(80.0));
/// assert_eq!(combined.overall_score, 77);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EnsembleScoringService;

impl EnsembleScoringService {
    pub fn new() -> Self {
        Self
    }

    pub fn combine(&self, rule: &AnalysisResult, roles: &[RoleAssessment]) -> AnalysisResult {
        if roles.is_empty() {
            return rule.clone();
        }

        let base_score = rule.score() as f64;
        let llm_score = weighted_mean(roles);
        // floor(0.6·rule + 0.4·llm), scaled to keep integer inputs exact
        let overall_score = clamp_score(((6.0 * base_score + 4.0 * llm_score) / 10.0).floor());

        let severity = roles
            .iter()
            .map(|r| r.severity)
            .fold(rule.severity, std::cmp::max);
        let urgency = roles
            .iter()
            .map(|r| r.urgency)
            .fold(rule.urgency, std::cmp::max);

        let mut reasons = Vec::new();
        if !rule.explanation.is_empty() {
            reasons.push(rule.explanation.clone());
        }
        for role in roles {
            if GOVERNANCE_ROLES.contains(&role.role_id.as_str()) && !role.explanation.is_empty() {
                reasons.push(format!("[{}] {}", role.role_id, role.explanation));
            }
        }
        let explanation = if reasons.is_empty() {
            rule.explanation.clone()
        } else {
            reasons.join(" ")
        };

        debug!(
            rule_score = base_score,
            llm_score,
            overall_score,
            roles = roles.len(),
            "Ensemble combined"
        );

        AnalysisResult {
            findings: rule.findings.clone(),
            overall_score,
            severity,
            urgency,
            explanation,
            reasons,
            rule_score: Some(base_score),
            llm_score: Some(llm_score),
            contributing_roles: roles.to_vec(),
        }
    }
}

/// Σ(score·weight) / Σweight, with the denominator falling back to 1.
fn weighted_mean(roles: &[RoleAssessment]) -> f64 {
    let total_weight: f64 = roles.iter().map(RoleAssessment::effective_weight).sum();
    let denominator = if total_weight > 0.0 { total_weight } else { 1.0 };
    let weighted: f64 = roles
        .iter()
        .map(|r| r.effective_score() * r.effective_weight())
        .sum();
    weighted / denominator
}
