//! Hash-chained audit log
//!
//! [`AuditLogService`] seals each event onto the chain tail under a single
//! lock, keeps a bounded ring buffer of recent entries, and hands every
//! entry to an [`AuditStore`]. Store failures are logged and swallowed: the
//! in-memory tail stays authoritative for the life of the process, so an
//! entry that failed to persist leaves a linkage gap that
//! [`verify_chain`](AuditLogService::verify_chain) will report.

use crate::ports::audit_store::AuditStore;
use arbiter_domain::audit::{self, GENESIS_HASH};
use arbiter_domain::{AuditEntry, AuditEvent, AuditQuery, ChainVerification, UserActivity};
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Entries scanned for a user activity summary
const ACTIVITY_SCAN_LIMIT: usize = 1000;

struct ChainState {
    tail_hash: String,
    last_timestamp: Option<DateTime<Utc>>,
    recent: VecDeque<AuditEntry>,
}

pub struct AuditLogService {
    store: Arc<dyn AuditStore>,
    capacity: usize,
    state: Mutex<ChainState>,
}

impl AuditLogService {
    /// Resume the chain from the store's tail, or start a new one.
    pub fn new(store: Arc<dyn AuditStore>, capacity: usize) -> Self {
        let (tail_hash, last_timestamp) = match store.load_tail() {
            Ok(Some(tail)) => {
                debug!(tail = %tail.entry_hash, "Resuming audit chain");
                (tail.entry_hash, Some(tail.timestamp))
            }
            Ok(None) => (GENESIS_HASH.to_string(), None),
            Err(e) => {
                warn!("Failed to recover audit chain tail, starting a new chain: {}", e);
                (GENESIS_HASH.to_string(), None)
            }
        };

        Self {
            store,
            capacity,
            state: Mutex::new(ChainState {
                tail_hash,
                last_timestamp,
                recent: VecDeque::with_capacity(capacity.min(1024)),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn tail_hash(&self) -> String {
        self.state().tail_hash.clone()
    }

    /// Append `event` to the chain and return the sealed entry.
    pub fn log(&self, event: AuditEvent) -> AuditEntry {
        let mut state = self.state();

        // Keep timestamp order equal to append order.
        let now = Utc::now();
        let timestamp = match state.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };

        let entry = AuditEntry::seal(
            event,
            Uuid::new_v4().to_string(),
            timestamp,
            state.tail_hash.clone(),
        );
        state.tail_hash = entry.entry_hash.clone();
        state.last_timestamp = Some(timestamp);
        state.recent.push_back(entry.clone());
        while state.recent.len() > self.capacity {
            state.recent.pop_front();
        }

        if let Err(e) = self.store.append(&entry) {
            error!(log_id = %entry.log_id, "Failed to persist audit entry: {}", e);
        }
        drop(state);

        info!(
            "Audit log recorded: {} by {} ({}) on {}:{}",
            entry.action, entry.user_id, entry.role, entry.resource_type, entry.resource_id
        );
        entry
    }

    /// Matching entries from the store and the ring buffer, newest first.
    pub fn get_logs(&self, query: &AuditQuery) -> Vec<AuditEntry> {
        let persisted = self.store.load_entries().unwrap_or_else(|e| {
            warn!("Failed to read audit log: {}", e);
            Vec::new()
        });
        let recent: Vec<AuditEntry> = self.state().recent.iter().cloned().collect();
        query.apply(persisted.iter().chain(recent.iter()))
    }

    pub fn get_user_activity(&self, user_id: &str, days: u32) -> UserActivity {
        let mut query = AuditQuery::for_user(user_id).with_limit(ACTIVITY_SCAN_LIMIT);
        query.start_time = Some(Utc::now() - Duration::days(i64::from(days)));
        UserActivity::summarize(user_id, days, self.get_logs(&query))
    }

    /// Replay the persisted records and report the first break, including
    /// entries missing after the recorded tail.
    pub fn verify_chain(&self) -> ChainVerification {
        let links = match self.store.load_chain() {
            Ok(links) => links,
            Err(e) => {
                warn!("Failed to read audit log for verification: {}", e);
                return ChainVerification::unavailable(e.to_string());
            }
        };
        let tail = self.store.load_tail().unwrap_or_else(|e| {
            warn!("Audit tail unavailable, skipping truncation check: {}", e);
            None
        });

        let result = audit::verify_links(&links, tail.as_ref());
        if !result.valid {
            warn!(
                index = ?result.invalid_index,
                failure = ?result.failure,
                "Audit chain verification failed"
            );
        }
        result
    }
}
