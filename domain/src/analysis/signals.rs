//! Quantitative signals attached to a finding
//!
//! Findings carry an open `quantitative_scores` map. The scorer only needs a
//! handful of its keys; this module extracts them leniently so that missing
//! or malformed values read as zero / false instead of failing.

use serde_json::Value;
use std::collections::BTreeMap;

/// Signal keys as produced by the upstream analyser, with accepted aliases.
const DOWNGRADE_KEYS: &[&str] = &["kpi_downgrade_count", "downgrade_count"];
const CONCENTRATION_KEYS: &[&str] = &[
    "decision_concentration_rate",
    "decision_concentration_ratio",
    "decision_concentration",
];
const OPPOSITION_KEYS: &[&str] = &["ignored_opposition_count", "opposition_ignored_count"];
const EXIT_KEYS: &[&str] = &["exit_discussed"];

/// The signals used by justification-phase scoring
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuantitativeSignals {
    /// How many times KPIs were revised downward
    pub downgrade_count: u32,
    /// Share of statements made by the single most active speaker (0.0-1.0)
    pub decision_concentration: f64,
    /// Opposing opinions raised in chat but not reflected in the meeting
    pub ignored_opposition_count: u32,
    /// Whether exit / pivot options were discussed at all
    pub exit_discussed: bool,
}

impl QuantitativeSignals {
    pub fn from_map(map: &BTreeMap<String, Value>) -> Self {
        Self {
            downgrade_count: lookup(map, DOWNGRADE_KEYS).map(as_count).unwrap_or(0),
            decision_concentration: lookup(map, CONCENTRATION_KEYS)
                .and_then(as_f64)
                .map(|v| v.clamp(0.0, 1.0))
                .unwrap_or(0.0),
            ignored_opposition_count: lookup(map, OPPOSITION_KEYS).map(as_count).unwrap_or(0),
            exit_discussed: lookup(map, EXIT_KEYS).map(as_bool).unwrap_or(false),
        }
    }
}

fn lookup<'a>(map: &'a BTreeMap<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

fn as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn as_count(value: &Value) -> u32 {
    as_f64(value)
        .map(|v| v.max(0.0).min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}
