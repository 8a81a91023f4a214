//! Dispatch State Machine
//!
//! This module handles:
//! - Drone registration
//! - Lifecycle transitions and their side effects
//! - Payload loading under battery, state and weight constraints
//! - Per-drone serialization of mutating operations

mod loader;
mod locks;
mod service;

pub use locks::DroneLocks;
pub use service::DispatchService;
