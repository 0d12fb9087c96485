//! Hash chain over audit entries

use super::entry::AuditEntry;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// `prev_hash` of the first entry
pub const GENESIS_HASH: &str = "";

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compact JSON with object keys sorted at every level.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    let _ = write!(out, "{}", Value::String(s.to_string()));
}

/// The hashed payload: every field except `prev_hash` and `entry_hash`.
fn hashed_fields(entry: &AuditEntry) -> Value {
    json!({
        "log_id": entry.log_id,
        "timestamp": entry.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        "user_id": entry.user_id,
        "role": entry.role,
        "action": entry.action.as_str(),
        "resource_type": entry.resource_type,
        "resource_id": entry.resource_id,
        "details": entry.details,
        "ip_address": entry.ip_address,
        "device_info": entry.device_info,
    })
}

pub fn compute_entry_hash(prev_hash: &str, entry: &AuditEntry) -> String {
    let payload = canonical_json(&hashed_fields(entry));
    sha256_hex(format!("{prev_hash}{payload}").as_bytes())
}

/// Position the next entry links to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTail {
    pub entry_hash: String,
    pub timestamp: DateTime<Utc>,
}

impl ChainTail {
    pub fn of(entry: &AuditEntry) -> Self {
        Self {
            entry_hash: entry.entry_hash.clone(),
            timestamp: entry.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainFailure {
    /// `prev_hash` does not match the recomputed hash of the entry before
    LinkageMismatch { expected: String, found: String },
    /// Stored `entry_hash` does not match the entry's content
    HashMismatch { expected: String, found: String },
    /// A persisted line that no longer parses as an entry
    Unparseable { location: String, message: String },
    /// The recorded tail hash never appears in the replay; entries are missing
    /// from the end
    Truncated { tail_hash: String, last_hash: String },
    /// Entries could not be read
    StoreUnavailable { message: String },
}

/// One persisted record as read back from a store, in append order
#[derive(Debug, Clone, PartialEq)]
pub enum ChainLink {
    Entry(AuditEntry),
    Unreadable { location: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVerification {
    pub valid: bool,
    pub total_entries: usize,
    /// Index (in timestamp order) of the first broken entry
    pub invalid_index: Option<usize>,
    pub failure: Option<ChainFailure>,
}

impl ChainVerification {
    pub fn intact(total_entries: usize) -> Self {
        Self {
            valid: true,
            total_entries,
            invalid_index: None,
            failure: None,
        }
    }

    pub fn broken(index: usize, total_entries: usize, failure: ChainFailure) -> Self {
        Self {
            valid: false,
            total_entries,
            invalid_index: Some(index),
            failure: Some(failure),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            total_entries: 0,
            invalid_index: None,
            failure: Some(ChainFailure::StoreUnavailable {
                message: message.into(),
            }),
        }
    }
}

/// Check one entry against the expected `prev_hash`; returns its hash.
fn check_entry(
    index: usize,
    total: usize,
    expected_prev: &str,
    entry: &AuditEntry,
) -> Result<String, ChainVerification> {
    if entry.prev_hash != expected_prev {
        return Err(ChainVerification::broken(
            index,
            total,
            ChainFailure::LinkageMismatch {
                expected: expected_prev.to_string(),
                found: entry.prev_hash.clone(),
            },
        ));
    }
    let recomputed = compute_entry_hash(&entry.prev_hash, entry);
    if recomputed != entry.entry_hash {
        return Err(ChainVerification::broken(
            index,
            total,
            ChainFailure::HashMismatch {
                expected: recomputed,
                found: entry.entry_hash.clone(),
            },
        ));
    }
    Ok(recomputed)
}

/// Replay `entries` in timestamp order and report the first break.
pub fn verify_chain(entries: &[AuditEntry]) -> ChainVerification {
    let mut ordered: Vec<&AuditEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    let total = ordered.len();
    let mut expected_prev = GENESIS_HASH.to_string();
    for (index, entry) in ordered.into_iter().enumerate() {
        match check_entry(index, total, &expected_prev, entry) {
            Ok(hash) => expected_prev = hash,
            Err(broken) => return broken,
        }
    }
    ChainVerification::intact(total)
}

/// Replay stored links in append order.
///
/// An unreadable link breaks the chain at its own position. With a `tail`,
/// the recorded tail hash must be one of the replayed hashes; otherwise the
/// log lost entries at the end and the break is reported at `total_entries`,
/// the first missing position. A tail matching an earlier entry is a stale
/// tail, not a truncation.
pub fn verify_links(links: &[ChainLink], tail: Option<&ChainTail>) -> ChainVerification {
    let total = links.len();
    let mut expected_prev = GENESIS_HASH.to_string();
    let mut tail_seen = tail.is_none_or(|t| t.entry_hash == GENESIS_HASH);

    for (index, link) in links.iter().enumerate() {
        match link {
            ChainLink::Entry(entry) => match check_entry(index, total, &expected_prev, entry) {
                Ok(hash) => {
                    tail_seen |= tail.is_some_and(|t| t.entry_hash == hash);
                    expected_prev = hash;
                }
                Err(broken) => return broken,
            },
            ChainLink::Unreadable { location, message } => {
                return ChainVerification::broken(
                    index,
                    total,
                    ChainFailure::Unparseable {
                        location: location.clone(),
                        message: message.clone(),
                    },
                );
            }
        }
    }

    match tail {
        Some(tail) if !tail_seen => ChainVerification::broken(
            total,
            total,
            ChainFailure::Truncated {
                tail_hash: tail.entry_hash.clone(),
                last_hash: expected_prev,
            },
        ),
        _ => ChainVerification::intact(total),
    }
}
