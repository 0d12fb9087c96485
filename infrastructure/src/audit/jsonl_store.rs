//! Daily JSONL audit files.
//!
//! Each entry is one line of canonical JSON (sorted keys, no whitespace) in
//! `audit_YYYYMMDD.jsonl`, named after the entry's UTC date. After every
//! append the chain tail is written to `audit_tail.json` through a temp file
//! and rename; when that file is missing or unreadable the tail is taken
//! from the last line of the newest log file.

use arbiter_application::ports::audit_store::{AuditStore, AuditStoreError};
use arbiter_domain::audit::canonical_json;
use arbiter_domain::{AuditEntry, ChainLink, ChainTail};
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

pub const TAIL_FILE: &str = "audit_tail.json";
const LOG_PREFIX: &str = "audit_";
const LOG_SUFFIX: &str = ".jsonl";

pub struct JsonlAuditStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditStore {
    /// Open (creating if needed) the audit directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AuditStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn day_file(&self, timestamp: DateTime<Utc>) -> PathBuf {
        self.dir.join(format!(
            "{LOG_PREFIX}{}{LOG_SUFFIX}",
            timestamp.format("%Y%m%d")
        ))
    }

    /// Daily log files, oldest first.
    pub fn log_files(&self) -> Result<Vec<PathBuf>, AuditStoreError> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(LOG_PREFIX) && n.ends_with(LOG_SUFFIX))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn write_tail(&self, tail: &ChainTail) -> Result<(), AuditStoreError> {
        let json =
            serde_json::to_string(tail).map_err(|e| AuditStoreError::Malformed(e.to_string()))?;
        let tmp = self.dir.join(format!("{TAIL_FILE}.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.dir.join(TAIL_FILE))?;
        Ok(())
    }

    fn read_tail_file(&self) -> Option<ChainTail> {
        let path = self.dir.join(TAIL_FILE);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(tail) => Some(tail),
            Err(e) => {
                warn!("Ignoring unreadable {}: {}", path.display(), e);
                None
            }
        }
    }

    fn last_line_tail(&self) -> Result<Option<ChainTail>, AuditStoreError> {
        for file in self.log_files()?.iter().rev() {
            let content = fs::read_to_string(file)?;
            if let Some(line) = content.lines().rev().find(|l| !l.trim().is_empty()) {
                let entry: AuditEntry = serde_json::from_str(line).map_err(|e| {
                    AuditStoreError::Malformed(format!("{}: {}", file.display(), e))
                })?;
                return Ok(Some(ChainTail::of(&entry)));
            }
        }
        Ok(None)
    }
}

impl AuditStore for JsonlAuditStore {
    fn append(&self, entry: &AuditEntry) -> Result<(), AuditStoreError> {
        let value =
            serde_json::to_value(entry).map_err(|e| AuditStoreError::Malformed(e.to_string()))?;
        let line = canonical_json(&value);

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.day_file(entry.timestamp))?;
        writeln!(file, "{line}")?;
        self.write_tail(&ChainTail::of(entry))
    }

    fn load_entries(&self) -> Result<Vec<AuditEntry>, AuditStoreError> {
        Ok(self
            .load_chain()?
            .into_iter()
            .filter_map(|link| match link {
                ChainLink::Entry(entry) => Some(entry),
                ChainLink::Unreadable { location, message } => {
                    warn!("Skipping unreadable audit line {}: {}", location, message);
                    None
                }
            })
            .collect())
    }

    fn load_chain(&self) -> Result<Vec<ChainLink>, AuditStoreError> {
        let mut links = Vec::new();
        for file in self.log_files()? {
            let content = fs::read_to_string(&file)?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            for (line_num, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                links.push(match serde_json::from_str::<AuditEntry>(line) {
                    Ok(entry) => ChainLink::Entry(entry),
                    Err(e) => ChainLink::Unreadable {
                        location: format!("{}:{}", name, line_num + 1),
                        message: e.to_string(),
                    },
                });
            }
        }
        Ok(links)
    }

    fn load_tail(&self) -> Result<Option<ChainTail>, AuditStoreError> {
        if let Some(tail) = self.read_tail_file() {
            return Ok(Some(tail));
        }
        debug!("No tail metadata, scanning newest audit file");
        self.last_line_tail()
    }
}
