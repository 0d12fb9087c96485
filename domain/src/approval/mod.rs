//! Approval domain
//!
//! Resolves who is responsible for an escalation (RACI) and drives the
//! multi-stage approval flow attached to it.
//!
//! # Flow
//!
//! ```text
//! ApprovalFlowTemplate: draft ──▶ manager_review ──▶ executive ──▶ approved
//!                                  [Manager]          [CEO, CFO]
//!
//! approve(role ∉ stage)     → ignored
//! approve(role ∈ stage)     → recorded once; advance when all roles recorded
//! reject(any role)         → rejected, terminal
//! ```

pub mod decision;
pub mod definitions;
pub mod flow;
pub mod quorum;
pub mod resolver;

pub use decision::ApprovalDecision;
pub use definitions::{
    APPROVED_STAGE_ID, ApprovalFlowCatalog, ApprovalFlowTemplate, ApprovalStage,
    DEFAULT_DECISION_TYPE, DecisionType, DefinitionSource, RaciMatrix, StaticDefinitions,
};
pub use flow::{ApprovalFlowEngine, ApprovalOutcome, Transition};
pub use quorum::StageQuorum;
pub use resolver::{Responsibility, ResponsibilityResolver};
