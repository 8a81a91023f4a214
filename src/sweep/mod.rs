//! Battery Sweep Scheduler
//!
//! Runs a background task that snapshots every drone's battery level into
//! the audit trail on a fixed interval.

mod battery;

pub use battery::{BatterySweep, SweepHandle, SweepReport};
