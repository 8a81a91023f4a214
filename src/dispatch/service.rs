//! Dispatch service - registration, transitions and field updates

use super::locks::DroneLocks;
use crate::audit::AuditRecorder;
use crate::catalog::MedicationCatalog;
use crate::store::FleetStore;
use dispatch_shared::{
    limits,
    state_machine::{next_state, DeliveryEvent},
    AuditEntry, DispatchError, Drone, DroneId, DronePatch, DroneState, NewDrone,
};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};

/// Owns the drone lifecycle. All state mutation goes through
/// [`DispatchService::record_state_change`].
pub struct DispatchService {
    pub(super) store: Arc<dyn FleetStore>,
    pub(super) catalog: Arc<dyn MedicationCatalog>,
    pub(super) audit: AuditRecorder,
    locks: DroneLocks,
}

impl DispatchService {
    pub fn new(store: Arc<dyn FleetStore>, catalog: Arc<dyn MedicationCatalog>) -> Self {
        Self {
            audit: AuditRecorder::new(store.clone()),
            store,
            catalog,
            locks: DroneLocks::new(),
        }
    }

    /// Register a drone. The drone always starts IDLE, whatever the request says.
    pub async fn register(&self, request: NewDrone) -> Result<Drone, DispatchError> {
        let drone = request.validate()?;
        if let Some(state) = request.state.filter(|s| *s != DroneState::Idle) {
            warn!(
                "[DISPATCH] Ignoring requested state {} for new drone {}",
                state, drone.serial_number
            );
        }

        self.audit.record_registration(&drone).await?;
        info!(
            "[DISPATCH] Registered drone {} ({}, {}g, {}%)",
            drone.serial_number, drone.model, drone.weight_limit, drone.battery_capacity
        );
        Ok(drone)
    }

    pub async fn get(&self, id: &DroneId) -> Result<Drone, DispatchError> {
        self.store
            .get_drone(id)
            .await?
            .ok_or_else(|| DispatchError::NotFound(format!("Drone {id} not found")))
    }

    pub async fn battery_level(&self, id: &DroneId) -> Result<u8, DispatchError> {
        Ok(self.get(id).await?.battery_capacity)
    }

    pub async fn audit_history(&self, id: &DroneId) -> Result<Vec<AuditEntry>, DispatchError> {
        self.audit.history(id).await
    }

    /// Apply an explicit patch: a battery edit or a requested target state
    pub async fn update(&self, id: &DroneId, patch: DronePatch) -> Result<Drone, DispatchError> {
        let (_guard, drone) = self.lock_drone(id).await?;

        match patch {
            DronePatch::Battery(level) => self.set_battery(drone, level).await,
            DronePatch::State(target) => self.route_transition(drone, target).await,
        }
    }

    pub async fn initiate_delivery(&self, id: &DroneId) -> Result<Drone, DispatchError> {
        let (_guard, drone) = self.lock_drone(id).await?;
        self.start_delivery(drone).await
    }

    pub async fn complete_delivery(&self, id: &DroneId) -> Result<Drone, DispatchError> {
        let (_guard, drone) = self.lock_drone(id).await?;
        self.finish_delivery(drone).await
    }

    pub async fn return_to_idle(&self, id: &DroneId) -> Result<Drone, DispatchError> {
        let (_guard, drone) = self.lock_drone(id).await?;
        self.dock(drone).await
    }

    /// Recovery path for a drone resting in DELIVERED
    pub async fn unload(&self, id: &DroneId) -> Result<Drone, DispatchError> {
        let (_guard, drone) = self.lock_drone(id).await?;
        self.unload_delivered(drone).await
    }

    /// Take the drone's lock and read its current record.
    ///
    /// Unknown ids are rejected before a lock entry is created for them.
    pub(super) async fn lock_drone(
        &self,
        id: &DroneId,
    ) -> Result<(OwnedMutexGuard<()>, Drone), DispatchError> {
        self.get(id).await?;
        let guard = self.locks.acquire(*id).await;
        let drone = self.get(id).await?;
        Ok((guard, drone))
    }

    async fn route_transition(
        &self,
        drone: Drone,
        target: DroneState,
    ) -> Result<Drone, DispatchError> {
        match (target, drone.state) {
            (DroneState::Delivering, _) => self.start_delivery(drone).await,
            (DroneState::Returning, DroneState::Delivered) => self.start_return(drone).await,
            (DroneState::Delivered | DroneState::Returning, _) => self.finish_delivery(drone).await,
            (DroneState::Idle, DroneState::Delivered) => self.unload_delivered(drone).await,
            (DroneState::Idle, _) => self.dock(drone).await,
            (DroneState::Loading | DroneState::Loaded, state) => Err(DispatchError::invalid_state(
                state,
                format!("move to {target} directly (use load)"),
            )),
        }
    }

    async fn set_battery(&self, mut drone: Drone, level: u8) -> Result<Drone, DispatchError> {
        if level > limits::MAX_BATTERY_PERCENT {
            return Err(DispatchError::Validation(format!(
                "battery capacity {level}% out of range"
            )));
        }

        // Battery edits are field writes, not state changes: no audit entry
        drone.battery_capacity = level;
        self.store.save_drone(&drone).await?;
        info!("[DISPATCH] drone {}: battery set to {}%", drone.serial_number, level);
        Ok(drone)
    }

    async fn start_delivery(&self, mut drone: Drone) -> Result<Drone, DispatchError> {
        self.record_state_change(&mut drone, DeliveryEvent::DeliveryStarted)
            .await?;
        Ok(drone)
    }

    /// DELIVERING -> DELIVERED, then DELIVERED -> RETURNING
    async fn finish_delivery(&self, mut drone: Drone) -> Result<Drone, DispatchError> {
        self.record_state_change(&mut drone, DeliveryEvent::DropOff)
            .await?;
        self.record_state_change(&mut drone, DeliveryEvent::ReturnStarted)
            .await?;
        Ok(drone)
    }

    /// Resume the return leg of a drone resting in DELIVERED
    async fn start_return(&self, mut drone: Drone) -> Result<Drone, DispatchError> {
        self.record_state_change(&mut drone, DeliveryEvent::ReturnStarted)
            .await?;
        Ok(drone)
    }

    async fn dock(&self, mut drone: Drone) -> Result<Drone, DispatchError> {
        self.record_state_change(&mut drone, DeliveryEvent::Docked)
            .await?;
        Ok(drone)
    }

    async fn unload_delivered(&self, mut drone: Drone) -> Result<Drone, DispatchError> {
        self.record_state_change(&mut drone, DeliveryEvent::Unloaded)
            .await?;
        Ok(drone)
    }

    /// Move `drone` along `event`, committing the new state together with a
    /// `{from, to}` audit entry. The payload is dropped in the same commit
    /// when the target state cannot hold one. `drone` is only updated once
    /// the commit succeeded.
    pub(super) async fn record_state_change(
        &self,
        drone: &mut Drone,
        event: DeliveryEvent,
    ) -> Result<(), DispatchError> {
        let from = drone.state;
        let to = next_state(from, event)
            .ok_or_else(|| DispatchError::invalid_state(from, event.action()))?;

        let mut next = drone.clone();
        next.state = to;
        if !to.holds_payload() {
            next.medications.clear();
        }
        self.audit.record_transition(&next, from).await?;
        *drone = next;

        info!("[DISPATCH] drone {}: {} -> {}", drone.serial_number, from, to);
        Ok(())
    }
}
