//! Escalation facade

use super::debounce::{DEFAULT_CAPACITY, DEFAULT_WINDOW_HOURS};
use super::record::{EscalationRecord, EscalationTier};
use super::staged::StagedEscalationEngine;
use super::strategy::{
    EscalationRequest, EscalationStrategy, LegacyStrategy, StagedStrategy, StrategyOutcome,
    minimal_record,
};
use crate::analysis::AnalysisResult;
use crate::evidence::{EvidenceCiter, EvidenceSources};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_THRESHOLD: u32 = 70;

/// When an analysis warrants escalation at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationCriteria {
    pub threshold: u32,
    /// Escalate on any non-empty findings list, regardless of score
    pub demo_mode: bool,
}

impl Default for EscalationCriteria {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, false)
    }
}

impl EscalationCriteria {
    pub fn new(threshold: u32, demo_mode: bool) -> Self {
        Self {
            threshold,
            demo_mode,
        }
    }

    /// `score ≥ threshold`, or HIGH / CRITICAL severity, or demo mode with
    /// at least one finding.
    pub fn should_escalate(&self, analysis: &AnalysisResult) -> bool {
        analysis.score() >= self.threshold
            || analysis.severity.is_elevated()
            || (self.demo_mode && analysis.has_findings())
    }
}

/// Facade configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationSettings {
    pub threshold: u32,
    pub demo_mode: bool,
    /// Try the staged / confidence tier before the legacy one
    pub enhanced_features: bool,
    pub debounce_hours: u32,
    pub debounce_capacity: usize,
}

impl Default for EscalationSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            demo_mode: false,
            enhanced_features: true,
            debounce_hours: DEFAULT_WINDOW_HOURS,
            debounce_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl EscalationSettings {
    pub fn criteria(&self) -> EscalationCriteria {
        EscalationCriteria::new(self.threshold, self.demo_mode)
    }
}

/// Decides whether to escalate and builds the record through an ordered
/// ladder of strategies.
///
/// Once [`should_escalate`](Self::should_escalate) is true,
/// [`create_escalation`](Self::create_escalation) always yields a record
/// unless the staged tier deliberately suppresses it (debounce).
pub struct EscalationEngine {
    criteria: EscalationCriteria,
    strategies: Vec<Box<dyn EscalationStrategy>>,
}

impl EscalationEngine {
    /// Standard ladder: staged (if enabled), then legacy.
    pub fn new(settings: &EscalationSettings, citer: Option<Arc<dyn EvidenceCiter>>) -> Self {
        let criteria = settings.criteria();
        let mut strategies: Vec<Box<dyn EscalationStrategy>> = Vec::new();

        if settings.enhanced_features {
            let mut staged = StagedStrategy::new(StagedEscalationEngine::new(
                settings.debounce_hours,
                settings.debounce_capacity,
            ));
            if let Some(citer) = citer {
                staged = staged.with_citer(citer);
            }
            strategies.push(Box::new(staged));
        }
        strategies.push(Box::new(LegacyStrategy::new(criteria)));

        Self::with_strategies(criteria, strategies)
    }

    pub fn with_strategies(
        criteria: EscalationCriteria,
        strategies: Vec<Box<dyn EscalationStrategy>>,
    ) -> Self {
        Self {
            criteria,
            strategies,
        }
    }

    pub fn criteria(&self) -> EscalationCriteria {
        self.criteria
    }

    pub fn tiers(&self) -> Vec<EscalationTier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    pub fn should_escalate(&self, analysis: &AnalysisResult) -> bool {
        self.criteria.should_escalate(analysis)
    }

    pub fn create_escalation(
        &self,
        analysis_id: &str,
        analysis: &AnalysisResult,
        evidence: Option<&EvidenceSources>,
    ) -> Option<EscalationRecord> {
        self.create_escalation_at(analysis_id, analysis, evidence, Utc::now())
    }

    pub fn create_escalation_at(
        &self,
        analysis_id: &str,
        analysis: &AnalysisResult,
        evidence: Option<&EvidenceSources>,
        now: DateTime<Utc>,
    ) -> Option<EscalationRecord> {
        if !self.should_escalate(analysis) {
            debug!(analysis_id, score = analysis.score(), "Escalation not required");
            return None;
        }

        let request = EscalationRequest::new(analysis_id, analysis)
            .with_evidence(evidence)
            .at(now);
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            let tier = strategy.tier();
            match strategy.escalate(&request) {
                Ok(StrategyOutcome::Created(record)) => {
                    info!(
                        analysis_id,
                        escalation_id = %record.escalation_id,
                        tier = %tier,
                        stage = ?record.stage,
                        "Escalation created"
                    );
                    let mut record = *record;
                    if !failures.is_empty() {
                        record.degraded_reason = Some(failures.join("; "));
                    }
                    return Some(record);
                }
                Ok(StrategyOutcome::Suppressed(reason)) => {
                    info!(analysis_id, tier = %tier, %reason, "Escalation suppressed");
                    return None;
                }
                Ok(StrategyOutcome::Declined(reason)) => {
                    debug!(analysis_id, tier = %tier, %reason, "Strategy declined");
                }
                Err(e) => {
                    warn!(analysis_id, tier = %tier, error = %e, "Strategy failed, falling back");
                    failures.push(format!("{}: {}", tier, e));
                }
            }
        }

        warn!(analysis_id, "Every strategy declined or failed, using minimal record");
        Some(minimal_record(&request, &failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Finding, RoleAssessment};
    use crate::core::level::{Severity, Urgency};
    use crate::escalation::stage::EscalationStage;
    use crate::escalation::strategy::StrategyError;

    fn analysis(score: u32, severity: Severity, findings: usize) -> AnalysisResult {
        AnalysisResult {
            findings: (0..findings).map(|_| Finding::new("B1", "j")).collect(),
            overall_score: score,
            severity,
            urgency: Urgency::High,
            rule_score: Some(score as f64),
            llm_score: Some(score as f64),
            contributing_roles: vec![RoleAssessment::new("executive", 1.0, score as f64)],
            ..Default::default()
        }
    }

    struct Broken;

    impl EscalationStrategy for Broken {
        fn tier(&self) -> EscalationTier {
            EscalationTier::Staged
        }

        fn escalate(
            &self,
            _request: &EscalationRequest<'_>,
        ) -> Result<StrategyOutcome, StrategyError> {
            Err(StrategyError::Failed {
                strategy: "broken",
                message: "boom".to_string(),
            })
        }
    }

    #[test]
    fn test_should_escalate_rules() {
        let engine = EscalationEngine::new(&EscalationSettings::default(), None);

        assert!(engine.should_escalate(&analysis(70, Severity::Medium, 1)));
        assert!(!engine.should_escalate(&analysis(69, Severity::Medium, 1)));
        assert!(engine.should_escalate(&analysis(10, Severity::High, 0)));
        assert!(engine.should_escalate(&analysis(10, Severity::Critical, 0)));
        assert!(!engine.should_escalate(&analysis(10, Severity::Low, 3)));
    }

    #[test]
    fn test_demo_mode_escalates_any_finding() {
        let settings = EscalationSettings {
            demo_mode: true,
            ..Default::default()
        };
        let engine = EscalationEngine::new(&settings, None);

        assert!(engine.should_escalate(&analysis(10, Severity::Low, 1)));
        assert!(!engine.should_escalate(&analysis(10, Severity::Low, 0)));
    }

    #[test]
    fn test_enhanced_ladder_uses_staged_tier() {
        let engine = EscalationEngine::new(&EscalationSettings::default(), None);
        assert_eq!(
            engine.tiers(),
            vec![EscalationTier::Staged, EscalationTier::Legacy]
        );

        let record = engine
            .create_escalation("a-1", &analysis(77, Severity::High, 1), None)
            .unwrap();
        assert_eq!(record.tier, EscalationTier::Staged);
        assert_eq!(record.stage, Some(EscalationStage::ApprovalRequest));
        assert!(record.degraded_reason.is_none());
    }

    #[test]
    fn test_legacy_only_when_enhanced_disabled() {
        let settings = EscalationSettings {
            enhanced_features: false,
            ..Default::default()
        };
        let engine = EscalationEngine::new(&settings, None);
        assert_eq!(engine.tiers(), vec![EscalationTier::Legacy]);

        let record = engine
            .create_escalation("a-1", &analysis(77, Severity::High, 1), None)
            .unwrap();
        assert_eq!(record.tier, EscalationTier::Legacy);
    }

    #[test]
    fn test_no_record_when_not_required() {
        let engine = EscalationEngine::new(&EscalationSettings::default(), None);
        assert!(engine
            .create_escalation("a-1", &analysis(30, Severity::Low, 1), None)
            .is_none());
    }

    #[test]
    fn test_failure_falls_back_to_legacy() {
        let criteria = EscalationCriteria::default();
        let engine = EscalationEngine::with_strategies(
            criteria,
            vec![Box::new(Broken), Box::new(LegacyStrategy::new(criteria))],
        );

        let record = engine
            .create_escalation("a-1", &analysis(75, Severity::High, 1), None)
            .unwrap();
        assert_eq!(record.tier, EscalationTier::Legacy);
        assert!(record.degraded_reason.unwrap().contains("boom"));
    }

    #[test]
    fn test_all_failures_yield_minimal_record() {
        let engine =
            EscalationEngine::with_strategies(EscalationCriteria::default(), vec![Box::new(Broken)]);

        let record = engine
            .create_escalation("a-1", &analysis(75, Severity::High, 1), None)
            .unwrap();
        assert_eq!(record.tier, EscalationTier::Minimal);
        assert_eq!(record.target_roles, vec!["Executive"]);
    }

    #[test]
    fn test_demo_mode_low_score_falls_through_to_legacy() {
        let settings = EscalationSettings {
            demo_mode: true,
            ..Default::default()
        };
        let engine = EscalationEngine::new(&settings, None);

        let record = engine
            .create_escalation("a-1", &analysis(20, Severity::Low, 1), None)
            .unwrap();
        assert_eq!(record.tier, EscalationTier::Legacy);
    }

    #[test]
    fn test_debounce_suppresses_second_escalation() {
        let engine = EscalationEngine::new(&EscalationSettings::default(), None);
        let input = analysis(75, Severity::High, 1);

        assert!(engine.create_escalation("a-1", &input, None).is_some());
        assert!(engine.create_escalation("a-2", &input, None).is_none());
    }
}
