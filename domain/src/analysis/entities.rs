//! Analysis entities

use super::pattern::PatternKind;
use super::signals::QuantitativeSignals;
use crate::core::level::{Severity, Urgency};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One detected structural decision-making anti-pattern with evidence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    #[serde(rename = "pattern_id")]
    pub pattern: PatternKind,
    pub severity: Severity,
    /// Upstream score (0-100), if the producer assigned one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub description: String,
    pub evidence: Vec<String>,
    pub quantitative_scores: BTreeMap<String, Value>,
}

impl Finding {
    pub fn new(pattern: impl Into<PatternKind>, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence.push(evidence.into());
        self
    }

    pub fn with_signal(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.quantitative_scores.insert(key.into(), value.into());
        self
    }

    pub fn signals(&self) -> QuantitativeSignals {
        QuantitativeSignals::from_map(&self.quantitative_scores)
    }
}

/// One LLM evaluator's view of the same material, from a given role's perspective
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleAssessment {
    pub role_id: String,
    /// Ensemble weight, never negative
    pub weight: f64,
    pub overall_score: f64,
    pub severity: Severity,
    pub urgency: Urgency,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub explanation: String,
}

impl RoleAssessment {
    pub fn new(role_id: impl Into<String>, weight: f64, overall_score: f64) -> Self {
        Self {
            role_id: role_id.into(),
            weight,
            overall_score,
            ..Default::default()
        }
    }

    pub fn with_levels(mut self, severity: Severity, urgency: Urgency) -> Self {
        self.severity = severity;
        self.urgency = urgency;
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Weight with malformed values (negative, NaN) read as zero.
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() {
            self.weight.max(0.0)
        } else {
            0.0
        }
    }

    /// Score clamped into `0..=100`, NaN read as zero.
    pub fn effective_score(&self) -> f64 {
        if self.overall_score.is_finite() {
            self.overall_score.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// The combined assessment of one analysed meeting / chat record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub findings: Vec<Finding>,
    pub overall_score: u32,
    pub severity: Severity,
    pub urgency: Urgency,
    pub explanation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
    /// Rule-based baseline score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_score: Option<f64>,
    /// Weighted mean of the role scores; `None` when no roles contributed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_score: Option<f64>,
    pub contributing_roles: Vec<RoleAssessment>,
}

impl AnalysisResult {
    /// The pattern of the first finding, which drives staging and routing.
    pub fn primary_pattern(&self) -> Option<&PatternKind> {
        self.findings.first().map(|f| &f.pattern)
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Overall score clamped into `0..=100`.
    pub fn score(&self) -> u32 {
        self.overall_score.min(100)
    }
}
