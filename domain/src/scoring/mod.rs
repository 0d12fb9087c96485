//! Scoring: per-finding evaluation, rule/LLM ensemble and agreement confidence
//!
//! ```text
//! Finding ──▶ ScoringService ──▶ rule baseline ─┐
//!                                               ├─▶ EnsembleScoringService ──▶ AnalysisResult
//! RoleAssessment × N ───────────────────────────┘                                  │
//!                                                      ConfidenceBasedEscalation ◀─┘
//! ```

pub mod confidence;
pub mod ensemble;
pub mod service;

pub use confidence::{ClarifyingQuestion, ConfidenceBasedEscalation, ConfidenceLevel};
pub use ensemble::{EnsembleScoringService, GOVERNANCE_ROLES};
pub use service::{QuantitativeBreakdown, ScoreEvaluation, ScoringService};
