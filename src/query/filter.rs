//! Query filters

use dispatch_shared::{Drone, DroneId, DroneModel, DroneState};

/// State constraint on a drone listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    /// Exactly this state
    Is(DroneState),
    /// Idle and charged enough to be loaded
    Available,
}

impl StateFilter {
    /// Parse a query value. Unrecognized values yield `None` (no constraint).
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("available") {
            return Some(StateFilter::Available);
        }
        value.parse().ok().map(StateFilter::Is)
    }

    fn matches(&self, drone: &Drone) -> bool {
        match self {
            StateFilter::Is(state) => drone.state == *state,
            StateFilter::Available => drone.is_available(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DroneFilter {
    pub state: Option<StateFilter>,
    pub model: Option<DroneModel>,
}

impl DroneFilter {
    /// Build a filter from raw query strings, dropping values that don't parse
    pub fn from_query(state: Option<&str>, model: Option<&str>) -> Self {
        Self {
            state: state.and_then(StateFilter::parse),
            model: model.and_then(|m| m.parse().ok()),
        }
    }

    pub fn matches(&self, drone: &Drone) -> bool {
        self.state.map_or(true, |s| s.matches(drone))
            && self.model.map_or(true, |m| drone.model == m)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicationFilter {
    /// Only medications currently loaded on this drone
    pub drone_id: Option<DroneId>,
}
