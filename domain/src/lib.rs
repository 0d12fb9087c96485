//! Domain layer for arbiter
//!
//! This crate contains the decision core: scoring, escalation, approval
//! flows and the audit hash chain. It performs no I/O; storage and
//! definition tables are reached through traits implemented by outer layers.
//!
//! # Core Concepts
//!
//! ## Scoring
//!
//! - **ScoringService**: rule-based importance/urgency for one finding
//! - **EnsembleScoringService**: blends the rule baseline with weighted
//!   role assessments, never ranking below the baseline
//! - **ConfidenceBasedEscalation**: turns low-confidence results into
//!   clarifying questions instead of notices
//!
//! ## Escalation
//!
//! A three-tier ladder (staged, legacy, minimal) that always produces a
//! record once the threshold is crossed.
//!
//! ## Approval
//!
//! RACI resolution and multi-stage approval where each stage needs every
//! listed role.
//!
//! ## Audit
//!
//! SHA-256 hash-chained entries with verification that pinpoints the first
//! tampered entry.

pub mod analysis;
pub mod approval;
pub mod audit;
pub mod core;
pub mod escalation;
pub mod evidence;
pub mod scoring;

pub use analysis::{AnalysisResult, Finding, PatternKind, QuantitativeSignals, RoleAssessment};
pub use approval::{
    ApprovalDecision, ApprovalFlowCatalog, ApprovalFlowEngine, ApprovalFlowTemplate,
    ApprovalOutcome, ApprovalStage, DecisionType, DefinitionSource, RaciMatrix, Responsibility,
    ResponsibilityResolver, StaticDefinitions, Transition,
};
pub use audit::{
    AuditAction, AuditEntry, AuditEvent, AuditQuery, ChainFailure, ChainLink, ChainTail,
    ChainVerification, UserActivity, verify_chain, verify_links,
};
pub use core::{
    error::DomainError,
    level::{Severity, Urgency, clamp_score},
};
pub use escalation::{
    EscalationCriteria, EscalationEngine, EscalationKind, EscalationRecord, EscalationRequest,
    EscalationSettings, EscalationStage, EscalationStatus, EscalationStrategy, EscalationTier,
    NotificationDebouncer, StagedEscalationEngine,
};
pub use evidence::{ChatMessage, EvidenceCiter, EvidenceSources, TranscriptEvidenceCiter};
pub use scoring::{
    ClarifyingQuestion, ConfidenceBasedEscalation, ConfidenceLevel, EnsembleScoringService,
    ScoreEvaluation, ScoringService,
};
