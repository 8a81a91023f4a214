//! Loading validator - gates the IDLE -> LOADED transition

use super::service::DispatchService;
use dispatch_shared::{
    limits, state_machine::DeliveryEvent, DispatchError, Drone, DroneId, DroneState, Medication,
};
use std::collections::HashSet;
use tracing::warn;

/// Reject empty or duplicated reference lists
fn check_references(references: &[String]) -> Result<(), DispatchError> {
    if references.is_empty() {
        return Err(DispatchError::Validation(
            "at least one medication reference is required".into(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = references.iter().find(|r| !seen.insert(r.as_str())) {
        return Err(DispatchError::Validation(format!(
            "duplicate medication reference: {dup}"
        )));
    }
    Ok(())
}

/// Battery and state checks, run before the drone leaves IDLE
fn check_ready(drone: &Drone) -> Result<(), DispatchError> {
    if drone.battery_capacity < limits::MIN_LOAD_BATTERY_PERCENT {
        return Err(DispatchError::Precondition(format!(
            "Battery below {}% ({}%)",
            limits::MIN_LOAD_BATTERY_PERCENT,
            drone.battery_capacity
        )));
    }
    if drone.state != DroneState::Idle {
        return Err(DispatchError::Precondition(format!(
            "Drone not idle (state: {})",
            drone.state
        )));
    }
    Ok(())
}

/// Every reference must resolve to exactly one entry
fn check_resolved(references: &[String], resolved: &[Medication]) -> Result<(), DispatchError> {
    if resolved.len() == references.len() {
        return Ok(());
    }
    let found: HashSet<&str> = resolved.iter().map(|m| m.code.as_str()).collect();
    let missing: Vec<&str> = references
        .iter()
        .map(String::as_str)
        .filter(|r| !found.contains(r))
        .collect();
    Err(DispatchError::NotFound(format!(
        "One or more medications not found: {}",
        missing.join(", ")
    )))
}

fn check_weight(drone: &Drone, medications: &[Medication]) -> Result<(), DispatchError> {
    let total: u64 = medications.iter().map(|m| u64::from(m.weight)).sum();
    if total > u64::from(drone.weight_limit) {
        return Err(DispatchError::Precondition(format!(
            "Weight {}g exceeds {}g",
            total, drone.weight_limit
        )));
    }
    Ok(())
}

impl DispatchService {
    /// Load a drone with the referenced medications.
    ///
    /// The drone passes through LOADING before the payload is resolved and
    /// weighed. If resolution or the weight check fails the drone stays in
    /// LOADING; callers must re-read the drone after a failed load.
    pub async fn load_drone(
        &self,
        id: &DroneId,
        references: &[String],
    ) -> Result<Drone, DispatchError> {
        check_references(references)?;
        let (_guard, mut drone) = self.lock_drone(id).await?;

        if let Err(e) = check_ready(&drone) {
            warn!("[LOAD] drone {} rejected: {}", drone.serial_number, e);
            return Err(e);
        }

        self.record_state_change(&mut drone, DeliveryEvent::LoadStarted)
            .await?;

        let medications = self.catalog.resolve_medications(references).await?;
        let checked = check_resolved(references, &medications)
            .and_then(|()| check_weight(&drone, &medications));
        if let Err(e) = checked {
            warn!(
                "[LOAD] drone {} left in {}: {}",
                drone.serial_number, drone.state, e
            );
            return Err(e);
        }

        drone.medications = medications;
        self.record_state_change(&mut drone, DeliveryEvent::LoadCompleted)
            .await?;
        Ok(drone)
    }
}
