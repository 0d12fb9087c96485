//! Evidence citation
//!
//! Links the evidence strings of findings back to concrete meeting
//! statements and chat messages so that escalation reasons can point at
//! where a claim came from.

pub mod citer;
pub mod sources;

pub use citer::{Citation, CitationSource, EvidenceCiter, EvidenceError, TranscriptEvidenceCiter};
pub use sources::{ChatMessage, EvidenceSources, Statement};
