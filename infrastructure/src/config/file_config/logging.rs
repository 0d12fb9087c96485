//! Diagnostic log configuration (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// When `dir` is set, tracing output is also written to a daily rolling
/// file there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub dir: Option<PathBuf>,
}
