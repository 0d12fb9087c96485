//! Escalation configuration from TOML (`[escalation]` section)

use arbiter_domain::EscalationSettings;
use serde::{Deserialize, Serialize};

/// Raw escalation configuration from TOML
///
/// # Example
///
/// ```toml
/// [escalation]
/// threshold = 70
/// demo_mode = false
/// enhanced_features = true
/// debounce_hours = 24
/// debounce_capacity = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEscalationConfig {
    /// Overall score at which an analysis escalates
    pub threshold: u32,
    /// Escalate any analysis with findings
    pub demo_mode: bool,
    /// Try the staged tier before the legacy one
    pub enhanced_features: bool,
    /// Suppression window for repeated notifications
    pub debounce_hours: u32,
    /// Most (stage, pattern) keys remembered by the debouncer
    pub debounce_capacity: usize,
}

impl Default for FileEscalationConfig {
    fn default() -> Self {
        let settings = EscalationSettings::default();
        Self {
            threshold: settings.threshold,
            demo_mode: settings.demo_mode,
            enhanced_features: settings.enhanced_features,
            debounce_hours: settings.debounce_hours,
            debounce_capacity: settings.debounce_capacity,
        }
    }
}

impl FileEscalationConfig {
    pub fn to_settings(&self) -> EscalationSettings {
        EscalationSettings {
            threshold: self.threshold,
            demo_mode: self.demo_mode,
            enhanced_features: self.enhanced_features,
            debounce_hours: self.debounce_hours,
            debounce_capacity: self.debounce_capacity,
        }
    }
}
