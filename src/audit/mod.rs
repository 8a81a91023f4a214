//! Audit Recorder
//!
//! Appends immutable audit entries tied to a drone. Every state change and
//! every battery check passes through here.

mod recorder;

pub use recorder::AuditRecorder;
