//! Persistence collaborator for drones and their audit trail
//!
//! This module handles:
//! - Drone records keyed by id, with unique serial numbers
//! - Append-only audit entries owned by their drone
//! - Atomic commit of a state change together with its audit entry

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::{FleetStore, StoreError};
