//! Error taxonomy shared by every dispatch operation

use thiserror::Error;

use crate::DroneState;

/// Errors reported synchronously to the caller of a dispatch operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Malformed or out-of-range input, rejected before any mutation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown drone or medication, or an unresolved medication reference
    #[error("Not found: {0}")]
    NotFound(String),

    /// Battery too low, wrong current state, or payload overweight
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The requested transition is not legal from the current state
    #[error("Cannot {action} from state {state}")]
    InvalidState { state: DroneState, action: String },

    /// The persistence collaborator failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DispatchError {
    pub fn invalid_state(state: DroneState, action: impl Into<String>) -> Self {
        DispatchError::InvalidState {
            state,
            action: action.into(),
        }
    }
}
