//! In-memory fleet store

use super::traits::{FleetStore, StoreError};
use async_trait::async_trait;
use dispatch_shared::{AuditEntry, Drone, DroneId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory store backed by hash maps.
///
/// Audit entries are kept per drone, so removing a drone removes its trail.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    drones: HashMap<DroneId, Drone>,
    audit: HashMap<DroneId, Vec<AuditEntry>>,
}

impl Inner {
    fn ensure_exists(&self, id: &DroneId) -> Result<(), StoreError> {
        if self.drones.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::Missing(format!("drone {id}")))
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored drones
    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.read().await.drones.len()
    }
}

#[async_trait]
impl FleetStore for MemoryStore {
    async fn insert_drone(&self, drone: &Drone, entry: &AuditEntry) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if inner
            .drones
            .values()
            .any(|d| d.serial_number == drone.serial_number)
        {
            return Err(StoreError::Conflict(format!(
                "serial number {} already registered",
                drone.serial_number
            )));
        }
        if inner.drones.contains_key(&drone.id) {
            return Err(StoreError::Conflict(format!("drone id {} already exists", drone.id)));
        }

        inner.drones.insert(drone.id, drone.clone());
        inner.audit.insert(drone.id, vec![entry.clone()]);
        Ok(())
    }

    async fn get_drone(&self, id: &DroneId) -> Result<Option<Drone>, StoreError> {
        Ok(self.inner.read().await.drones.get(id).cloned())
    }

    async fn list_drones(&self) -> Result<Vec<Drone>, StoreError> {
        Ok(self.inner.read().await.drones.values().cloned().collect())
    }

    async fn save_drone(&self, drone: &Drone) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.ensure_exists(&drone.id)?;
        inner.drones.insert(drone.id, drone.clone());
        Ok(())
    }

    async fn commit_transition(
        &self,
        drone: &Drone,
        entry: &AuditEntry,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.ensure_exists(&drone.id)?;
        inner.audit.entry(drone.id).or_default().push(entry.clone());
        inner.drones.insert(drone.id, drone.clone());
        Ok(())
    }

    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.ensure_exists(&entry.drone_id)?;
        inner.audit.entry(entry.drone_id).or_default().push(entry.clone());
        Ok(())
    }

    async fn audit_for(&self, drone_id: &DroneId) -> Result<Vec<AuditEntry>, StoreError> {
        let inner = self.inner.read().await;
        inner.ensure_exists(drone_id)?;
        Ok(inner.audit.get(drone_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_shared::{DroneState, NewDrone};

    fn drone(serial: &str) -> Drone {
        NewDrone::new(serial, "Lightweight", 100, 100).validate().unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let d = drone("SN-1");
        store.insert_drone(&d, &AuditEntry::registered(d.id)).await.unwrap();

        assert_eq!(store.get_drone(&d.id).await.unwrap(), Some(d.clone()));
        assert_eq!(store.audit_for(&d.id).await.unwrap().len(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_serial_rejected() {
        let store = MemoryStore::new();
        let a = drone("SN-1");
        let b = drone("SN-1");
        store.insert_drone(&a, &AuditEntry::registered(a.id)).await.unwrap();

        let err = store
            .insert_drone(&b, &AuditEntry::registered(b.id))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_commit_transition_writes_both() {
        let store = MemoryStore::new();
        let mut d = drone("SN-1");
        store.insert_drone(&d, &AuditEntry::registered(d.id)).await.unwrap();

        let entry = AuditEntry::state_change(d.id, d.state, DroneState::Loading);
        d.state = DroneState::Loading;
        store.commit_transition(&d, &entry).await.unwrap();

        let stored = store.get_drone(&d.id).await.unwrap().unwrap();
        assert_eq!(stored.state, DroneState::Loading);
        let trail = store.audit_for(&d.id).await.unwrap();
        assert_eq!(trail.last(), Some(&entry));
    }

    #[tokio::test]
    async fn test_writes_for_unknown_drone_fail() {
        let store = MemoryStore::new();
        let d = drone("SN-1");

        assert!(matches!(
            store.save_drone(&d).await,
            Err(StoreError::Missing(_))
        ));
        assert!(matches!(
            store.append_audit(&AuditEntry::battery_check(d.id, 50)).await,
            Err(StoreError::Missing(_))
        ));
    }
}
