//! Escalation domain
//!
//! Decides whether an analysis warrants human attention, at which stage,
//! and builds the [`EscalationRecord`] that the approval flow then drives.
//!
//! # Fallback ladder
//!
//! ```text
//! EscalationEngine::create_escalation
//!   │
//!   ├─▶ StagedStrategy   stage + debounce + confidence/question + evidence
//!   │      └─ declined (no stage) or failed ─┐
//!   ├─▶ LegacyStrategy   single stage, Executive  ◀┘
//!   │      └─ declined or failed ─┐
//!   └─▶ minimal record            ◀┘   (always succeeds)
//! ```
//!
//! A debounce veto from the staged tier is a legitimate outcome and stops
//! the ladder without creating a record.

pub mod debounce;
pub mod engine;
pub mod record;
pub mod stage;
pub mod staged;
pub mod strategy;

pub use debounce::{DebounceError, NotificationDebouncer};
pub use engine::{EscalationCriteria, EscalationEngine, EscalationSettings};
pub use record::{
    EscalationKind, EscalationRecord, EscalationStatus, EscalationTier, StageApproval,
};
pub use stage::{EscalationStage, StageDescriptor};
pub use staged::{StagedEscalationEngine, StagingOutcome};
pub use strategy::{
    EscalationRequest, EscalationStrategy, LegacyStrategy, StagedStrategy, StrategyError,
    StrategyOutcome, minimal_record,
};
