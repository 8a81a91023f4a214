//! In-memory medication catalog keyed by medication code

use super::MedicationCatalog;
use async_trait::async_trait;
use dispatch_shared::{DispatchError, Medication, NewMedication};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Catalog held in memory, ordered by code
#[derive(Default)]
pub struct MemoryCatalog {
    by_code: RwLock<BTreeMap<String, Medication>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a medication. Codes are unique.
    pub async fn insert(&self, new: NewMedication) -> Result<Medication, DispatchError> {
        let medication = new.validate()?;
        let mut by_code = self.by_code.write().await;

        if by_code.contains_key(&medication.code) {
            return Err(DispatchError::Validation(format!(
                "medication code {} already exists",
                medication.code
            )));
        }

        debug!("Catalog insert: {} ({}g)", medication.code, medication.weight);
        by_code.insert(medication.code.clone(), medication.clone());
        Ok(medication)
    }
}

#[async_trait]
impl MedicationCatalog for MemoryCatalog {
    async fn resolve_medications(
        &self,
        references: &[String],
    ) -> Result<Vec<Medication>, DispatchError> {
        let by_code = self.by_code.read().await;
        Ok(references
            .iter()
            .filter_map(|code| by_code.get(code).cloned())
            .collect())
    }

    async fn list_medications(&self) -> Result<Vec<Medication>, DispatchError> {
        Ok(self.by_code.read().await.values().cloned().collect())
    }
}
