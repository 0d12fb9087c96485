//! File-backed audit store.

mod jsonl_store;

pub use jsonl_store::{JsonlAuditStore, TAIL_FILE};
