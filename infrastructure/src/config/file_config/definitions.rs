//! Definition table location (`[definitions]` section)

use arbiter_application::config::arbiter_config::DEFAULT_DEFINITIONS_DIR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDefinitionsConfig {
    /// Directory holding `raci.json` and `approval_flows.json`
    pub dir: PathBuf,
}

impl Default for FileDefinitionsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DEFINITIONS_DIR),
        }
    }
}
