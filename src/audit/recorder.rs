use crate::store::FleetStore;
use dispatch_shared::{AuditEntry, DispatchError, Drone, DroneId, DroneState};
use std::sync::Arc;
use tracing::debug;

/// Writes audit entries through the fleet store
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn FleetStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    /// Persist a new drone together with its `{toState: IDLE}` entry
    pub async fn record_registration(&self, drone: &Drone) -> Result<AuditEntry, DispatchError> {
        let entry = AuditEntry::registered(drone.id);
        self.store.insert_drone(drone, &entry).await?;
        debug!("[AUDIT] {} registered", drone.serial_number);
        Ok(entry)
    }

    /// Persist `drone` (already in its new state) with a `{from, to}` entry
    pub async fn record_transition(
        &self,
        drone: &Drone,
        from: DroneState,
    ) -> Result<AuditEntry, DispatchError> {
        let entry = AuditEntry::state_change(drone.id, from, drone.state);
        self.store.commit_transition(drone, &entry).await?;
        debug!("[AUDIT] {}: {} -> {}", drone.serial_number, from, drone.state);
        Ok(entry)
    }

    /// Append a `{batteryLevel}` entry for the drone's current charge
    pub async fn record_battery(&self, drone: &Drone) -> Result<AuditEntry, DispatchError> {
        let entry = AuditEntry::battery_check(drone.id, drone.battery_capacity);
        self.store.append_audit(&entry).await?;
        Ok(entry)
    }

    /// Entries of one drone in creation order
    pub async fn history(&self, drone_id: &DroneId) -> Result<Vec<AuditEntry>, DispatchError> {
        Ok(self.store.audit_for(drone_id).await?)
    }
}
