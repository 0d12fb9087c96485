//! Audit log queries

use super::entry::{AuditAction, AuditEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Filter over audit entries; unset fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditQuery {
    pub user_id: Option<String>,
    pub role: Option<String>,
    pub action: Option<AuditAction>,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub limit: usize,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            user_id: None,
            role: None,
            action: None,
            resource_type: None,
            resource_id: None,
            start_time: None,
            end_time: None,
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl AuditQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref().is_none_or(|w| w == have)
        }

        eq(&self.user_id, &entry.user_id)
            && eq(&self.role, &entry.role)
            && self.action.is_none_or(|a| a == entry.action)
            && eq(&self.resource_type, &entry.resource_type)
            && eq(&self.resource_id, &entry.resource_id)
            && self.start_time.is_none_or(|t| entry.timestamp >= t)
            && self.end_time.is_none_or(|t| entry.timestamp <= t)
    }

    /// Matching entries, newest first, deduplicated by `log_id`.
    pub fn apply<'a>(&self, entries: impl IntoIterator<Item = &'a AuditEntry>) -> Vec<AuditEntry> {
        let mut seen = std::collections::HashSet::new();
        let mut matched: Vec<AuditEntry> = entries
            .into_iter()
            .filter(|e| self.matches(e))
            .filter(|e| seen.insert(e.log_id.clone()))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched.truncate(self.limit);
        matched
    }
}

pub const RECENT_ACTIVITY_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub user_id: String,
    pub period_days: u32,
    pub total_actions: usize,
    pub action_counts: BTreeMap<AuditAction, usize>,
    pub recent: Vec<AuditEntry>,
}

impl UserActivity {
    /// Summarize `entries`, which are expected newest first.
    pub fn summarize(user_id: impl Into<String>, period_days: u32, entries: Vec<AuditEntry>) -> Self {
        let mut action_counts = BTreeMap::new();
        for entry in &entries {
            *action_counts.entry(entry.action).or_insert(0) += 1;
        }
        Self {
            user_id: user_id.into(),
            period_days,
            total_actions: entries.len(),
            action_counts,
            recent: entries.into_iter().take(RECENT_ACTIVITY_LEN).collect(),
        }
    }
}
