//! Analysis input model
//!
//! An [`AnalysisResult`] is produced once by an upstream analyser (rule
//! engine plus optional LLM role evaluators) and is immutable afterwards.
//! Everything downstream (scoring, staging, approval) reads it.

pub mod entities;
pub mod pattern;
pub mod signals;

pub use entities::{AnalysisResult, Finding, RoleAssessment};
pub use pattern::PatternKind;
pub use signals::QuantitativeSignals;
