//! Escalation strategies: the rungs of the fallback ladder

use super::debounce::DebounceError;
use super::engine::EscalationCriteria;
use super::record::{EscalationKind, EscalationRecord, EscalationTier};
use super::stage::detection_sentence;
use super::staged::{StagedEscalationEngine, StagingOutcome};
use crate::analysis::AnalysisResult;
use crate::evidence::{EvidenceCiter, EvidenceSources};
use crate::scoring::ConfidenceBasedEscalation;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

const EXECUTIVE: &str = "Executive";

/// Everything a strategy needs to build a record
#[derive(Debug, Clone, Copy)]
pub struct EscalationRequest<'a> {
    pub analysis_id: &'a str,
    pub analysis: &'a AnalysisResult,
    pub evidence: Option<&'a EvidenceSources>,
    pub now: DateTime<Utc>,
}

impl<'a> EscalationRequest<'a> {
    pub fn new(analysis_id: &'a str, analysis: &'a AnalysisResult) -> Self {
        Self {
            analysis_id,
            analysis,
            evidence: None,
            now: Utc::now(),
        }
    }

    pub fn with_evidence(mut self, evidence: Option<&'a EvidenceSources>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// Non-error results of a strategy
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    Created(Box<EscalationRecord>),
    /// Escalation is deliberately withheld; stop the ladder
    Suppressed(String),
    /// This strategy does not apply; try the next one
    Declined(String),
}

/// Failure of one rung, logged before demoting to the next
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Debounce state unavailable: {0}")]
    Debounce(#[from] DebounceError),

    #[error("Strategy '{strategy}' failed: {message}")]
    Failed {
        strategy: &'static str,
        message: String,
    },
}

pub trait EscalationStrategy: Send + Sync {
    fn tier(&self) -> EscalationTier;

    fn escalate(&self, request: &EscalationRequest<'_>) -> Result<StrategyOutcome, StrategyError>;
}

/// Staged escalation enriched with evidence citations and confidence
pub struct StagedStrategy {
    engine: StagedEscalationEngine,
    confidence: ConfidenceBasedEscalation,
    citer: Option<Arc<dyn EvidenceCiter>>,
}

impl StagedStrategy {
    pub fn new(engine: StagedEscalationEngine) -> Self {
        Self {
            engine,
            confidence: ConfidenceBasedEscalation::new(),
            citer: None,
        }
    }

    pub fn with_citer(mut self, citer: Arc<dyn EvidenceCiter>) -> Self {
        self.citer = Some(citer);
        self
    }

    pub fn engine(&self) -> &StagedEscalationEngine {
        &self.engine
    }

    fn attach_evidence(&self, record: &mut EscalationRecord, request: &EscalationRequest<'_>) {
        let (Some(citer), Some(sources)) = (&self.citer, request.evidence) else {
            return;
        };
        if record.reason.is_empty() || request.analysis.findings.is_empty() {
            return;
        }
        match citer.cite(&record.reason, &request.analysis.findings, sources) {
            Ok(reason) => record.reason = reason,
            Err(e) => warn!(
                analysis_id = request.analysis_id,
                error = %e,
                "Failed to add evidence citations"
            ),
        }
    }

    fn attach_confidence(&self, record: &mut EscalationRecord, analysis: &AnalysisResult) {
        let confidence = self.confidence.calculate_confidence(analysis);
        let level = self.confidence.confidence_level(analysis);
        record.confidence = Some(confidence);
        record.confidence_level = Some(level);

        if self.confidence.should_ask_question(analysis) {
            let question = self.confidence.generate_question(analysis);
            record.target_roles = question.target_roles.clone();
            record.question = Some(question);
            record.kind = EscalationKind::Question;
        }
    }
}

impl EscalationStrategy for StagedStrategy {
    fn tier(&self) -> EscalationTier {
        EscalationTier::Staged
    }

    fn escalate(&self, request: &EscalationRequest<'_>) -> Result<StrategyOutcome, StrategyError> {
        let outcome = self.engine.stage_escalation_at(
            request.analysis_id,
            request.analysis,
            request.analysis.primary_pattern(),
            request.now,
        )?;

        match outcome {
            StagingOutcome::NoStage => Ok(StrategyOutcome::Declined(
                "score and severity below every stage".to_string(),
            )),
            StagingOutcome::Debounced { stage, pattern_id } => Ok(StrategyOutcome::Suppressed(
                format!("pattern '{}' already notified at stage {}", pattern_id, stage),
            )),
            StagingOutcome::Staged(mut record) => {
                self.attach_evidence(&mut record, request);
                self.attach_confidence(&mut record, request.analysis);
                Ok(StrategyOutcome::Created(record))
            }
        }
    }
}

/// Single-stage escalation straight to the Executive
#[derive(Debug, Clone, Copy)]
pub struct LegacyStrategy {
    criteria: EscalationCriteria,
}

impl LegacyStrategy {
    pub fn new(criteria: EscalationCriteria) -> Self {
        Self { criteria }
    }

    pub fn generate_reason(analysis: &AnalysisResult) -> String {
        if analysis.findings.is_empty() {
            return detection_sentence(None).to_string();
        }
        format!(
            "{} Score: {} (severity: {}, urgency: {}) Structural change requires Executive approval.",
            detection_sentence(analysis.primary_pattern()),
            analysis.score(),
            analysis.severity,
            analysis.urgency
        )
    }
}

impl EscalationStrategy for LegacyStrategy {
    fn tier(&self) -> EscalationTier {
        EscalationTier::Legacy
    }

    fn escalate(&self, request: &EscalationRequest<'_>) -> Result<StrategyOutcome, StrategyError> {
        if !self.criteria.should_escalate(request.analysis) {
            return Ok(StrategyOutcome::Declined(
                "escalation criteria not met".to_string(),
            ));
        }

        let analysis = request.analysis;
        let mut record =
            EscalationRecord::new(request.analysis_id, EscalationTier::Legacy, request.now);
        record.target_roles = vec![EXECUTIVE.to_string()];
        record.reason = Self::generate_reason(analysis);
        record.severity = analysis.severity;
        record.urgency = analysis.urgency;
        record.score = analysis.score();

        Ok(StrategyOutcome::Created(Box::new(record)))
    }
}

/// The last rung: a record built from the raw analysis that cannot fail.
pub fn minimal_record(request: &EscalationRequest<'_>, failures: &[String]) -> EscalationRecord {
    let analysis = request.analysis;
    let mut record =
        EscalationRecord::new(request.analysis_id, EscalationTier::Minimal, request.now);
    record.target_roles = vec![EXECUTIVE.to_string()];
    record.reason = format!(
        "{} Score: {} (severity: {}, urgency: {})",
        detection_sentence(analysis.primary_pattern()),
        analysis.score(),
        analysis.severity,
        analysis.urgency
    );
    record.severity = analysis.severity;
    record.urgency = analysis.urgency;
    record.score = analysis.score();
    if !failures.is_empty() {
        record.degraded_reason = Some(failures.join("; "));
    }
    record
}
