//! Port for audit log persistence.
//!
//! Separate from `tracing`: tracing carries diagnostics, this port carries
//! the hash-chained record of who did what. Methods are synchronous; the
//! service calls them under its chain lock.

use arbiter_domain::{AuditEntry, ChainLink, ChainTail};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditStoreError {
    #[error("Audit I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed audit data: {0}")]
    Malformed(String),
}

pub trait AuditStore: Send + Sync {
    /// Persist one sealed entry after the current tail.
    fn append(&self, entry: &AuditEntry) -> Result<(), AuditStoreError>;

    /// Every readable persisted entry, in file order.
    fn load_entries(&self) -> Result<Vec<AuditEntry>, AuditStoreError>;

    /// Every persisted record in append order, unreadable ones included so
    /// verification can report them at their position.
    fn load_chain(&self) -> Result<Vec<ChainLink>, AuditStoreError> {
        Ok(self
            .load_entries()?
            .into_iter()
            .map(ChainLink::Entry)
            .collect())
    }

    /// Hash and timestamp of the last persisted entry, `None` for an empty log.
    fn load_tail(&self) -> Result<Option<ChainTail>, AuditStoreError>;
}

/// Store that keeps nothing; the service still chains entries in memory.
pub struct NoAuditStore;

impl AuditStore for NoAuditStore {
    fn append(&self, _entry: &AuditEntry) -> Result<(), AuditStoreError> {
        Ok(())
    }

    fn load_entries(&self) -> Result<Vec<AuditEntry>, AuditStoreError> {
        Ok(Vec::new())
    }

    fn load_tail(&self) -> Result<Option<ChainTail>, AuditStoreError> {
        Ok(None)
    }
}
