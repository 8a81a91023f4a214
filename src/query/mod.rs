//! Fleet Query Engine
//!
//! Filters and paginates drones and medications.

mod filter;
mod fleet;

pub use filter::{DroneFilter, MedicationFilter, StateFilter};
pub use fleet::FleetQuery;
