//! JSON definition loader
//!
//! Reads `raci.json` and `approval_flows.json` from one directory when
//! constructed. A missing or unreadable table is logged and treated as
//! absent, so resolution falls back to defaults instead of failing.

use arbiter_domain::{ApprovalFlowCatalog, DefinitionSource, RaciMatrix};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const RACI_FILE: &str = "raci.json";
pub const APPROVAL_FLOWS_FILE: &str = "approval_flows.json";

#[derive(Error, Debug)]
pub enum DefinitionLoadError {
    #[error("{0} not found")]
    Missing(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct JsonDefinitionLoader {
    dir: PathBuf,
    raci: Option<Arc<RaciMatrix>>,
    approval_flows: Option<Arc<ApprovalFlowCatalog>>,
}

impl JsonDefinitionLoader {
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let raci = read_or_absent(&dir.join(RACI_FILE)).map(Arc::new);
        let approval_flows = read_or_absent(&dir.join(APPROVAL_FLOWS_FILE)).map(Arc::new);
        info!(
            dir = %dir.display(),
            raci = raci.is_some(),
            approval_flows = approval_flows.is_some(),
            "Loaded definitions"
        );
        Self {
            dir,
            raci,
            approval_flows,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<T, DefinitionLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DefinitionLoadError::Missing(path.to_path_buf())
            } else {
                DefinitionLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&content).map_err(|source| DefinitionLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn read_or_absent<T: DeserializeOwned>(path: &Path) -> Option<T> {
    match JsonDefinitionLoader::read_table(path) {
        Ok(table) => Some(table),
        Err(e @ DefinitionLoadError::Missing(_)) => {
            debug!("{}", e);
            None
        }
        Err(e) => {
            warn!("{}, using defaults", e);
            None
        }
    }
}

impl DefinitionSource for JsonDefinitionLoader {
    fn raci(&self) -> Option<Arc<RaciMatrix>> {
        self.raci.clone()
    }

    fn approval_flows(&self) -> Option<Arc<ApprovalFlowCatalog>> {
        self.approval_flows.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RACI: &str = r#"{
        "decision_types": [
            {"decision_type_id": "B1_justification_phase", "R": ["CFO"], "A": ["CEO"]},
            {"decision_type_id": "default", "R": ["Executive"]}
        ]
    }"#;

    const FLOWS: &str = r#"{
        "templates": [{
            "flow_id": "standard",
            "decision_type_ids": ["default"],
            "stages": [
                {"stage_id": "draft", "approver_role_ids": [], "next": "review"},
                {"stage_id": "review", "approver_role_ids": ["Manager"], "next": null}
            ]
        }]
    }"#;

    #[test]
    fn test_loads_both_tables() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(RACI_FILE), RACI).unwrap();
        std::fs::write(dir.path().join(APPROVAL_FLOWS_FILE), FLOWS).unwrap();

        let loader = JsonDefinitionLoader::load(dir.path());
        let raci = loader.raci().unwrap();
        assert_eq!(raci.decision_types[0].responsible, vec!["CFO"]);
        let flows = loader.approval_flows().unwrap();
        assert_eq!(
            flows.template("standard").unwrap().initial_stage_id(),
            Some("review")
        );
    }

    #[test]
    fn test_missing_files_are_absent() {
        let dir = TempDir::new().unwrap();
        let loader = JsonDefinitionLoader::load(dir.path());
        assert!(loader.raci().is_none());
        assert!(loader.approval_flows().is_none());
    }

    #[test]
    fn test_invalid_json_is_absent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(RACI_FILE), "{not json").unwrap();
        std::fs::write(dir.path().join(APPROVAL_FLOWS_FILE), FLOWS).unwrap();

        let loader = JsonDefinitionLoader::load(dir.path());
        assert!(loader.raci().is_none());
        assert!(loader.approval_flows().is_some());

        let err = JsonDefinitionLoader::read_table::<RaciMatrix>(&dir.path().join(RACI_FILE))
            .unwrap_err();
        assert!(matches!(err, DefinitionLoadError::Parse { .. }));
    }
}
