//! Medication catalog collaborator
//!
//! The dispatch core only needs to resolve medication references and to
//! list catalog entries; record management lives behind this interface.

mod memory;

pub use memory::MemoryCatalog;

use async_trait::async_trait;
use dispatch_shared::{DispatchError, Medication};

/// Lookup interface consumed by the loading validator and fleet queries
#[async_trait]
pub trait MedicationCatalog: Send + Sync {
    /// Resolve opaque references to catalog entries.
    ///
    /// Returns only the references that resolve; a result shorter than the
    /// request means some references are unknown.
    async fn resolve_medications(
        &self,
        references: &[String],
    ) -> Result<Vec<Medication>, DispatchError>;

    /// All catalog entries
    async fn list_medications(&self) -> Result<Vec<Medication>, DispatchError>;
}
