//! Audit domain
//!
//! Every observable action becomes an [`AuditEntry`] linked into a SHA-256
//! hash chain:
//!
//! ```text
//! entry_hash[i] = sha256_hex(prev_hash[i] ++ canonical_json(entry[i] without hashes))
//! prev_hash[i]  = entry_hash[i-1]        prev_hash[0] = ""
//! ```

pub mod chain;
pub mod entry;
pub mod query;

pub use chain::{
    ChainFailure, ChainLink, ChainTail, ChainVerification, GENESIS_HASH, canonical_json,
    compute_entry_hash, sha256_hex, verify_chain, verify_links,
};
pub use entry::{AuditAction, AuditEntry, AuditEvent};
pub use query::{AuditQuery, UserActivity};
