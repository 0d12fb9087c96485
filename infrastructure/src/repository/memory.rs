//! Process-local escalation store.

use arbiter_application::ports::escalation_repository::{EscalationRepository, RepositoryError};
use arbiter_domain::EscalationRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryEscalationRepository {
    records: RwLock<HashMap<String, EscalationRecord>>,
}

impl InMemoryEscalationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl EscalationRepository for InMemoryEscalationRepository {
    async fn get(&self, escalation_id: &str) -> Result<Option<EscalationRecord>, RepositoryError> {
        Ok(self.records.read().await.get(escalation_id).cloned())
    }

    async fn save(&self, record: &EscalationRecord) -> Result<(), RepositoryError> {
        self.records
            .write()
            .await
            .insert(record.escalation_id.clone(), record.clone());
        Ok(())
    }

    /// Oldest first.
    async fn list(&self) -> Result<Vec<EscalationRecord>, RepositoryError> {
        let mut records: Vec<EscalationRecord> =
            self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.escalation_id.cmp(&b.escalation_id))
        });
        Ok(records)
    }
}
