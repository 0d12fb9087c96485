//! Severity and urgency levels
//!
//! Both levels are ordinal. Ensemble merging takes the maximum over all
//! evaluators and stage determination compares against them, so the
//! derived `Ord` follows declaration order from least to most serious.

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clamp a raw score into the `0..=100` range, rounding to the nearest integer.
///
/// `NaN` maps to 0.
pub fn clamp_score(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

/// How serious a finding is
///
/// # Example
///
/// ```
/// use arbiter_domain::core::level::Severity;
///
/// assert_eq!(Severity::from_score(92), Severity::Critical);
/// assert_eq!(Severity::from_score(70), Severity::High);
/// assert!(Severity::Critical > Severity::High);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Band an overall score: ≥90 critical, ≥70 high, ≥40 medium.
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Severity::Critical,
            70..=89 => Severity::High,
            40..=69 => Severity::Medium,
            _ => Severity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// HIGH and CRITICAL always warrant escalation.
    pub fn is_elevated(&self) -> bool {
        *self >= Severity::High
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(DomainError::InvalidSeverity(s.to_string())),
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// How soon a finding needs attention
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
    Immediate,
}

impl Urgency {
    /// Band an urgency score: ≥80 immediate, ≥60 urgent, ≥40 high, ≥20 medium.
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Urgency::Immediate,
            60..=79 => Urgency::Urgent,
            40..=59 => Urgency::High,
            20..=39 => Urgency::Medium,
            _ => Urgency::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "LOW",
            Urgency::Medium => "MEDIUM",
            Urgency::High => "HIGH",
            Urgency::Urgent => "URGENT",
            Urgency::Immediate => "IMMEDIATE",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(Urgency::Low),
            "MEDIUM" => Ok(Urgency::Medium),
            "HIGH" => Ok(Urgency::High),
            "URGENT" => Ok(Urgency::Urgent),
            "IMMEDIATE" => Ok(Urgency::Immediate),
            _ => Err(DomainError::InvalidUrgency(s.to_string())),
        }
    }
}

impl From<String> for Urgency {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5.0), 0);
        assert_eq!(clamp_score(42.4), 42);
        assert_eq!(clamp_score(42.5), 43);
        assert_eq!(clamp_score(180.0), 100);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::from_score(0), Severity::Low);
        assert_eq!(Severity::from_score(39), Severity::Low);
        assert_eq!(Severity::from_score(40), Severity::Medium);
        assert_eq!(Severity::from_score(69), Severity::Medium);
        assert_eq!(Severity::from_score(70), Severity::High);
        assert_eq!(Severity::from_score(89), Severity::High);
        assert_eq!(Severity::from_score(90), Severity::Critical);
        assert_eq!(Severity::from_score(100), Severity::Critical);
    }

    #[test]
    fn test_urgency_bands() {
        assert_eq!(Urgency::from_score(19), Urgency::Low);
        assert_eq!(Urgency::from_score(20), Urgency::Medium);
        assert_eq!(Urgency::from_score(40), Urgency::High);
        assert_eq!(Urgency::from_score(60), Urgency::Urgent);
        assert_eq!(Urgency::from_score(80), Urgency::Immediate);
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
        assert!(Urgency::Urgent < Urgency::Immediate);
        assert!(Urgency::High < Urgency::Urgent);
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("high".parse::<Severity>().ok(), Some(Severity::High));
        assert_eq!("URGENT".parse::<Urgency>().ok(), Some(Urgency::Urgent));
        assert!("severe".parse::<Severity>().is_err());
    }

    #[test]
    fn test_unknown_level_deserializes_to_low() {
        let severity: Severity = serde_json::from_str("\"SEVERE\"").unwrap();
        assert_eq!(severity, Severity::Low);

        let urgency: Urgency = serde_json::from_str("\"immediate\"").unwrap();
        assert_eq!(urgency, Urgency::Immediate);
    }

    #[test]
    fn test_serialize_uppercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"CRITICAL\""
        );
        assert_eq!(serde_json::to_string(&Urgency::Urgent).unwrap(), "\"URGENT\"");
    }

    #[test]
    fn test_is_elevated() {
        assert!(Severity::High.is_elevated());
        assert!(Severity::Critical.is_elevated());
        assert!(!Severity::Medium.is_elevated());
    }
}
