//! Store trait abstraction for pluggable persistence backends

use async_trait::async_trait;
use dispatch_shared::{AuditEntry, DispatchError, Drone, DroneId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique key is already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The referenced record does not exist
    #[error("Missing record: {0}")]
    Missing(String),

    #[error("Backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for DispatchError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => DispatchError::Validation(msg),
            StoreError::Missing(msg) => DispatchError::NotFound(msg),
            StoreError::Backend(msg) => DispatchError::Storage(msg),
        }
    }
}

/// Durable storage for drones and audit entries.
///
/// Every write that pairs a drone with an audit entry must be applied
/// atomically: either both are visible afterwards or neither is.
#[async_trait]
pub trait FleetStore: Send + Sync {
    /// Insert a newly registered drone with its registration entry
    async fn insert_drone(&self, drone: &Drone, entry: &AuditEntry) -> Result<(), StoreError>;

    async fn get_drone(&self, id: &DroneId) -> Result<Option<Drone>, StoreError>;

    async fn list_drones(&self) -> Result<Vec<Drone>, StoreError>;

    /// Overwrite a drone record without touching the audit trail
    async fn save_drone(&self, drone: &Drone) -> Result<(), StoreError>;

    /// Persist a drone together with the entry recording its state change
    async fn commit_transition(&self, drone: &Drone, entry: &AuditEntry)
        -> Result<(), StoreError>;

    /// Append a standalone audit entry
    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StoreError>;

    /// Audit entries of one drone in creation order
    async fn audit_for(&self, drone_id: &DroneId) -> Result<Vec<AuditEntry>, StoreError>;
}
