//! Drone dispatch service
//!
//! Coordinates a fleet of delivery drones: registration, payload loading
//! under battery and weight constraints, the delivery lifecycle, fleet
//! queries and a periodic battery audit. Every state change is recorded in
//! the drone's audit trail.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod query;
pub mod seed;
pub mod shutdown;
pub mod store;
pub mod sweep;

pub use audit::AuditRecorder;
pub use catalog::{MedicationCatalog, MemoryCatalog};
pub use config::DispatchConfig;
pub use dispatch::DispatchService;
pub use query::{DroneFilter, FleetQuery, MedicationFilter, StateFilter};
pub use store::{FleetStore, MemoryStore, StoreError};
pub use sweep::{BatterySweep, SweepHandle, SweepReport};
