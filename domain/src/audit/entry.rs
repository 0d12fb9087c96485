//! Audit entries

use super::chain::compute_entry_hash;
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    ViewAnalysis,
    ViewMeeting,
    ViewChat,
    Escalate,
    Approve,
    Reject,
    Execute,
}

impl AuditAction {
    pub const ALL: [AuditAction; 7] = [
        AuditAction::ViewAnalysis,
        AuditAction::ViewMeeting,
        AuditAction::ViewChat,
        AuditAction::Escalate,
        AuditAction::Approve,
        AuditAction::Reject,
        AuditAction::Execute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ViewAnalysis => "view_analysis",
            AuditAction::ViewMeeting => "view_meeting",
            AuditAction::ViewChat => "view_chat",
            AuditAction::Escalate => "escalate",
            AuditAction::Approve => "approve",
            AuditAction::Reject => "reject",
            AuditAction::Execute => "execute",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| DomainError::InvalidAuditAction(s.to_string()))
    }
}

/// An action to be logged, before it is placed in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub user_id: String,
    pub role: String,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub details: Value,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
}

impl AuditEvent {
    pub fn new(
        user_id: impl Into<String>,
        role: impl Into<String>,
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            details: Value::Object(Default::default()),
            ip_address: None,
            device_info: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn with_device_info(mut self, device_info: impl Into<String>) -> Self {
        self.device_info = Some(device_info.into());
        self
    }
}

/// One persisted line of the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub log_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub role: String,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    #[serde(default)]
    pub details: Value,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub device_info: Option<String>,
    #[serde(default)]
    pub prev_hash: String,
    #[serde(default)]
    pub entry_hash: String,
}

impl AuditEntry {
    /// Place `event` after `prev_hash` and compute its hash.
    pub fn seal(
        event: AuditEvent,
        log_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        prev_hash: impl Into<String>,
    ) -> Self {
        let mut entry = Self {
            log_id: log_id.into(),
            timestamp,
            user_id: event.user_id,
            role: event.role,
            action: event.action,
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            details: event.details,
            ip_address: event.ip_address,
            device_info: event.device_info,
            prev_hash: prev_hash.into(),
            entry_hash: String::new(),
        };
        entry.entry_hash = compute_entry_hash(&entry.prev_hash, &entry);
        entry
    }
}
