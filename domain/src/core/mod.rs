//! Core domain concepts shared across all subdomains.
//!
//! - [`level::Severity`] / [`level::Urgency`]: ordinal assessment levels
//! - [`level::clamp_score`]: normalises raw scores into `0..=100`
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod level;
