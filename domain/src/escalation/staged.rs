//! Staged escalation engine

use super::debounce::{DebounceError, NotificationDebouncer};
use super::record::{EscalationRecord, EscalationTier};
use super::stage::{EscalationStage, StageDescriptor, detection_sentence};
use crate::analysis::{AnalysisResult, PatternKind};
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::{debug, info};

/// What staging an analysis produced
#[derive(Debug, Clone, PartialEq)]
pub enum StagingOutcome {
    /// Score and severity are below every stage
    NoStage,
    /// The pattern already notified within the debounce window
    Debounced {
        stage: EscalationStage,
        pattern_id: String,
    },
    Staged(Box<EscalationRecord>),
}

impl StagingOutcome {
    pub fn into_record(self) -> Option<EscalationRecord> {
        match self {
            StagingOutcome::Staged(record) => Some(*record),
            _ => None,
        }
    }
}

/// Maps score / severity to one of four stages and debounces repeat
/// notifications per pattern.
///
/// The debounce state is owned by the engine and guarded by a mutex, so one
/// engine can be shared across threads.
#[derive(Debug, Default)]
pub struct StagedEscalationEngine {
    debouncer: Mutex<NotificationDebouncer>,
}

impl StagedEscalationEngine {
    pub fn new(window_hours: u32, capacity: usize) -> Self {
        Self::with_debouncer(NotificationDebouncer::new(window_hours, capacity))
    }

    pub fn with_debouncer(debouncer: NotificationDebouncer) -> Self {
        Self {
            debouncer: Mutex::new(debouncer),
        }
    }

    pub fn determine_stage(&self, analysis: &AnalysisResult) -> Option<EscalationStage> {
        EscalationStage::determine(analysis.score(), analysis.severity)
    }

    pub fn stage_descriptor(&self, stage: EscalationStage) -> StageDescriptor {
        stage.descriptor()
    }

    /// Debounce check against the current time. Fails open (notifies) if the
    /// debounce state is unavailable.
    pub fn should_notify(&self, stage: Option<EscalationStage>, pattern_id: Option<&str>) -> bool {
        self.try_should_notify_at(stage, pattern_id, Utc::now())
            .unwrap_or(true)
    }

    pub fn try_should_notify_at(
        &self,
        stage: Option<EscalationStage>,
        pattern_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool, DebounceError> {
        let mut debouncer = self.debouncer.lock().map_err(|_| DebounceError::Poisoned)?;
        Ok(debouncer.should_notify_at(stage, pattern_id, now))
    }

    /// Stage an analysis: determine the stage, consult the debounce window and
    /// build a pending record.
    pub fn stage_escalation_at(
        &self,
        analysis_id: &str,
        analysis: &AnalysisResult,
        pattern: Option<&PatternKind>,
        now: DateTime<Utc>,
    ) -> Result<StagingOutcome, DebounceError> {
        let Some(stage) = self.determine_stage(analysis) else {
            debug!(analysis_id, score = analysis.score(), "No escalation stage");
            return Ok(StagingOutcome::NoStage);
        };

        let pattern_id = pattern.map(PatternKind::id);
        if !self.try_should_notify_at(Some(stage), pattern_id, now)? {
            let pattern_id = pattern_id.unwrap_or_default().to_string();
            info!(
                analysis_id,
                pattern_id = %pattern_id,
                stage = %stage,
                "Debounce window active, skipping notification"
            );
            return Ok(StagingOutcome::Debounced { stage, pattern_id });
        }

        let descriptor = stage.descriptor();
        let mut record = EscalationRecord::new(analysis_id, EscalationTier::Staged, now);
        record.stage = Some(stage);
        record.stage_name = Some(descriptor.name.to_string());
        record.target_roles = descriptor.target_roles();
        record.reason = stage_reason(analysis, &descriptor);
        record.description = Some(descriptor.description.to_string());
        record.severity = analysis.severity;
        record.urgency = analysis.urgency;
        record.score = analysis.score();
        record.action_required = descriptor.action_required;

        Ok(StagingOutcome::Staged(Box::new(record)))
    }

    /// `None` when there is no stage or the debounce window vetoes.
    pub fn create_escalation_with_stage(
        &self,
        analysis_id: &str,
        analysis: &AnalysisResult,
        pattern: Option<&PatternKind>,
    ) -> Option<EscalationRecord> {
        self.stage_escalation_at(analysis_id, analysis, pattern, Utc::now())
            .ok()
            .and_then(StagingOutcome::into_record)
    }
}

fn stage_reason(analysis: &AnalysisResult, descriptor: &StageDescriptor) -> String {
    if analysis.findings.is_empty() {
        return format!("{} Score: {}", descriptor.description, analysis.score());
    }
    format!(
        "{} {} Score: {} (severity: {}, urgency: {})",
        descriptor.description,
        detection_sentence(analysis.primary_pattern()),
        analysis.score(),
        analysis.severity,
        analysis.urgency
    )
}
