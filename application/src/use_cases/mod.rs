//! Use cases (application services)
//!
//! - [`assess_analysis`]: rule baseline + ensemble scoring
//! - [`raise_escalation`]: escalate, assign approval flow, store, audit
//! - [`submit_approval`]: serialized approval decisions per escalation

pub mod assess_analysis;
pub mod raise_escalation;
pub mod submit_approval;

#[cfg(test)]
pub(crate) mod test_support;
