//! Drone Dispatch Shared Types
//!
//! This crate provides the domain records, error taxonomy, pagination
//! contract and delivery state machine used by the dispatch service and
//! by any layer that exposes it.

pub mod error;
pub mod model;
pub mod page;
pub mod state_machine;

pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;

pub use error::DispatchError;
pub use model::*;
pub use page::{Page, PageMeta, PageRequest};

/// Get the current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Operating limits for the fleet
pub mod limits {
    /// Minimum battery percentage required to load a drone
    pub const MIN_LOAD_BATTERY_PERCENT: u8 = 25;

    /// Upper bound for a drone's weight limit
    pub const MAX_WEIGHT_LIMIT_GRAMS: u32 = 500;

    pub const MAX_BATTERY_PERCENT: u8 = 100;

    pub const MAX_SERIAL_LEN: usize = 100;

    /// Maximum length of a medication name or code
    pub const MAX_MEDICATION_FIELD_LEN: usize = 100;

    pub const DEFAULT_PAGE_LIMIT: u32 = 10;

    pub const MAX_PAGE_LIMIT: u32 = 100;

    /// Interval between battery sweeps
    pub const BATTERY_SWEEP_INTERVAL_SECS: u64 = 3600;
}
