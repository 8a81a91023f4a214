//! Delivery State Machine
//!
//! Defines the legal lifecycle transitions of a drone. The cycle is
//! `IDLE -> LOADING -> LOADED -> DELIVERING -> DELIVERED -> RETURNING -> IDLE`,
//! plus the `DELIVERED -> IDLE` unload path.

use crate::DroneState;

/// Events that move a drone along its delivery lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryEvent {
    /// Payload loading started
    LoadStarted,
    /// Payload attached and within limits
    LoadCompleted,
    /// Drone left for its destination
    DeliveryStarted,
    /// Payload handed over at the destination
    DropOff,
    /// Drone is heading back
    ReturnStarted,
    /// Drone is back at base
    Docked,
    /// Payload removed at base without a return leg
    Unloaded,
}

impl DeliveryEvent {
    /// Operation name used in error messages
    pub fn action(&self) -> &'static str {
        match self {
            DeliveryEvent::LoadStarted => "start loading",
            DeliveryEvent::LoadCompleted => "complete loading",
            DeliveryEvent::DeliveryStarted => "initiate delivery",
            DeliveryEvent::DropOff => "complete delivery",
            DeliveryEvent::ReturnStarted => "start return",
            DeliveryEvent::Docked => "return to idle",
            DeliveryEvent::Unloaded => "unload",
        }
    }
}

/// Get the next state for a given event, if the transition is valid
pub fn next_state(from: DroneState, event: DeliveryEvent) -> Option<DroneState> {
    use DeliveryEvent::*;
    use DroneState::*;

    match (from, event) {
        (Idle, LoadStarted) => Some(Loading),
        (Loading, LoadCompleted) => Some(Loaded),
        (Loaded, DeliveryStarted) => Some(Delivering),
        (Delivering, DropOff) => Some(Delivered),
        (Delivered, ReturnStarted) => Some(Returning),
        (Returning, Docked) => Some(Idle),
        (Delivered, Unloaded) => Some(Idle),

        _ => None,
    }
}
