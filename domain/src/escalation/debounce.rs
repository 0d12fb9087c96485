//! Per-pattern notification debounce
//!
//! Remembers when each pattern last produced a notification and vetoes
//! repeats inside the window. The map is bounded: entries older than the
//! window are dropped (they would notify again anyway), and when the map
//! is still full the least recently notified pattern is evicted.

use super::stage::EscalationStage;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_WINDOW_HOURS: u32 = 24;
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DebounceError {
    #[error("Debounce state is poisoned by a panicked writer")]
    Poisoned,
}

#[derive(Debug, Clone)]
pub struct NotificationDebouncer {
    window: Duration,
    capacity: usize,
    last_sent: HashMap<String, DateTime<Utc>>,
}

impl Default for NotificationDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_HOURS, DEFAULT_CAPACITY)
    }
}

impl NotificationDebouncer {
    pub fn new(window_hours: u32, capacity: usize) -> Self {
        Self {
            window: Duration::hours(i64::from(window_hours)),
            capacity: capacity.max(1),
            last_sent: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.last_sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_sent.is_empty()
    }

    pub fn last_notified(&self, pattern_id: &str) -> Option<DateTime<Utc>> {
        self.last_sent.get(pattern_id).copied()
    }

    /// Decide whether a notification for `pattern_id` at `stage` may fire now.
    ///
    /// - no stage: never
    /// - forced agenda: always (and the window is not touched)
    /// - no pattern: always
    /// - first notification for the pattern, or window elapsed: yes, recorded
    /// - otherwise: vetoed
    pub fn should_notify_at(
        &mut self,
        stage: Option<EscalationStage>,
        pattern_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(stage) = stage else {
            return false;
        };
        if stage == EscalationStage::ForcedAgenda {
            return true;
        }
        let Some(pattern_id) = pattern_id.filter(|p| !p.is_empty()) else {
            return true;
        };

        match self.last_sent.get(pattern_id) {
            Some(last) if now.signed_duration_since(*last) < self.window => false,
            _ => {
                self.record(pattern_id, now);
                true
            }
        }
    }

    fn record(&mut self, pattern_id: &str, now: DateTime<Utc>) {
        let window = self.window;
        self.last_sent
            .retain(|_, last| now.signed_duration_since(*last) < window);

        if self.last_sent.len() >= self.capacity && !self.last_sent.contains_key(pattern_id) {
            let oldest = self
                .last_sent
                .iter()
                .min_by_key(|(_, last)| **last)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                self.last_sent.remove(&oldest);
            }
        }

        self.last_sent.insert(pattern_id.to_string(), now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap() + Duration::hours(i64::from(hour))
    }

    #[test]
    fn test_no_stage_never_notifies() {
        let mut debouncer = NotificationDebouncer::default();
        assert!(!debouncer.should_notify_at(None, Some("B1"), at(0)));
        assert!(debouncer.is_empty());
    }

    #[test]
    fn test_repeat_within_window_is_vetoed() {
        let mut debouncer = NotificationDebouncer::default();
        let stage = Some(EscalationStage::ApprovalRequest);

        assert!(debouncer.should_notify_at(stage, Some("B1"), at(0)));
        assert!(!debouncer.should_notify_at(stage, Some("B1"), at(1)));
        assert!(!debouncer.should_notify_at(stage, Some("B1"), at(23)));
        assert!(debouncer.should_notify_at(stage, Some("B1"), at(24)));
        assert_eq!(debouncer.last_notified("B1"), Some(at(24)));
    }

    #[test]
    fn test_forced_agenda_always_notifies() {
        let mut debouncer = NotificationDebouncer::default();
        let stage = Some(EscalationStage::ForcedAgenda);

        assert!(debouncer.should_notify_at(stage, Some("B1"), at(0)));
        assert!(debouncer.should_notify_at(stage, Some("B1"), at(0)));
        assert!(debouncer.is_empty());
    }

    #[test]
    fn test_missing_pattern_always_notifies() {
        let mut debouncer = NotificationDebouncer::default();
        let stage = Some(EscalationStage::Review);

        assert!(debouncer.should_notify_at(stage, None, at(0)));
        assert!(debouncer.should_notify_at(stage, None, at(0)));
        assert!(debouncer.should_notify_at(stage, Some(""), at(0)));
    }

    #[test]
    fn test_patterns_are_independent() {
        let mut debouncer = NotificationDebouncer::default();
        let stage = Some(EscalationStage::Review);

        assert!(debouncer.should_notify_at(stage, Some("B1"), at(0)));
        assert!(debouncer.should_notify_at(stage, Some("ES1"), at(0)));
        assert!(!debouncer.should_notify_at(stage, Some("B1"), at(2)));
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let mut debouncer = NotificationDebouncer::new(1, 16);
        let stage = Some(EscalationStage::Review);

        debouncer.should_notify_at(stage, Some("a"), at(0));
        debouncer.should_notify_at(stage, Some("b"), at(0));
        debouncer.should_notify_at(stage, Some("c"), at(5));

        assert_eq!(debouncer.len(), 1);
        assert!(debouncer.last_notified("a").is_none());
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let mut debouncer = NotificationDebouncer::new(48, 2);
        let stage = Some(EscalationStage::Review);

        debouncer.should_notify_at(stage, Some("a"), at(0));
        debouncer.should_notify_at(stage, Some("b"), at(1));
        debouncer.should_notify_at(stage, Some("c"), at(2));

        assert_eq!(debouncer.len(), 2);
        assert!(debouncer.last_notified("a").is_none());
        assert!(debouncer.last_notified("b").is_some());
        // an evicted pattern notifies again
        assert!(debouncer.should_notify_at(stage, Some("a"), at(3)));
    }
}
