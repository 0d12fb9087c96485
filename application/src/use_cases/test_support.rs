//! Shared fixtures for use case tests.

use crate::ports::escalation_repository::{EscalationRepository, RepositoryError};
use arbiter_domain::{
    ApprovalFlowCatalog, ApprovalFlowTemplate, ApprovalStage, DecisionType, DefinitionSource,
    EscalationRecord, RaciMatrix, StaticDefinitions,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Repository that yields between read and write to widen race windows.
#[derive(Default)]
pub struct MemoryRepository {
    records: Mutex<HashMap<String, EscalationRecord>>,
}

#[async_trait]
impl EscalationRepository for MemoryRepository {
    async fn get(&self, escalation_id: &str) -> Result<Option<EscalationRecord>, RepositoryError> {
        let record = self.records.lock().unwrap().get(escalation_id).cloned();
        tokio::task::yield_now().await;
        Ok(record)
    }

    async fn save(&self, record: &EscalationRecord) -> Result<(), RepositoryError> {
        tokio::task::yield_now().await;
        self.records
            .lock()
            .unwrap()
            .insert(record.escalation_id.clone(), record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<EscalationRecord>, RepositoryError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }
}

/// `B1` → CFO via flow `two_step`: draft → manager [Manager] → exec [A, B].
pub fn definitions() -> Arc<dyn DefinitionSource> {
    let raci = RaciMatrix {
        decision_types: vec![
            DecisionType::new("B1_justification_phase", &["CFO"]),
            DecisionType::new("default", &["Executive"]),
        ],
    };
    let flows = ApprovalFlowCatalog {
        templates: vec![ApprovalFlowTemplate {
            flow_id: "two_step".to_string(),
            decision_type_ids: vec!["default".to_string()],
            stages: vec![
                ApprovalStage::new("draft", &[], Some("manager")),
                ApprovalStage::new("manager", &["Manager"], Some("exec")),
                ApprovalStage::new("exec", &["A", "B"], Some("approved")),
            ],
        }],
    };
    Arc::new(StaticDefinitions::new(raci, flows))
}

/// Everything resolves to `default` → CFO via flow `sign_off` with one stage [CFO].
pub fn single_stage_definitions() -> Arc<dyn DefinitionSource> {
    let raci = RaciMatrix {
        decision_types: vec![DecisionType::new("default", &["CFO"])],
    };
    let flows = ApprovalFlowCatalog {
        templates: vec![ApprovalFlowTemplate {
            flow_id: "sign_off".to_string(),
            decision_type_ids: vec!["default".to_string()],
            stages: vec![ApprovalStage::new("cfo", &["CFO"], None)],
        }],
    };
    Arc::new(StaticDefinitions::new(raci, flows))
}
