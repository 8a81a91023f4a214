//! Domain records for drones, medications and the audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DispatchError;
use crate::limits;

pub type DroneId = Uuid;
pub type MedicationId = Uuid;
pub type AuditId = Uuid;

/// Weight class of a drone. The class carries no numeric limit of its own;
/// the limit is the drone's `weight_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneModel {
    Lightweight,
    Middleweight,
    Cruiserweight,
    Heavyweight,
}

impl DroneModel {
    pub const ALL: [DroneModel; 4] = [
        DroneModel::Lightweight,
        DroneModel::Middleweight,
        DroneModel::Cruiserweight,
        DroneModel::Heavyweight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DroneModel::Lightweight => "Lightweight",
            DroneModel::Middleweight => "Middleweight",
            DroneModel::Cruiserweight => "Cruiserweight",
            DroneModel::Heavyweight => "Heavyweight",
        }
    }
}

impl fmt::Display for DroneModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DroneModel {
    type Err = DispatchError;

    /// Model names are matched case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DroneModel::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DispatchError::Validation(format!("unknown drone model: {s:?}")))
    }
}

/// Delivery lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DroneState {
    Idle,
    Loading,
    Loaded,
    Delivering,
    Delivered,
    Returning,
}

impl DroneState {
    pub const ALL: [DroneState; 6] = [
        DroneState::Idle,
        DroneState::Loading,
        DroneState::Loaded,
        DroneState::Delivering,
        DroneState::Delivered,
        DroneState::Returning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DroneState::Idle => "IDLE",
            DroneState::Loading => "LOADING",
            DroneState::Loaded => "LOADED",
            DroneState::Delivering => "DELIVERING",
            DroneState::Delivered => "DELIVERED",
            DroneState::Returning => "RETURNING",
        }
    }

    /// States in which a drone may carry medications
    pub fn holds_payload(&self) -> bool {
        matches!(
            self,
            DroneState::Loading | DroneState::Loaded | DroneState::Delivering
        )
    }
}

impl fmt::Display for DroneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DroneState {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DroneState::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DispatchError::Validation(format!("unknown drone state: {s:?}")))
    }
}

/// A catalog item that can be loaded onto a drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: MedicationId,
    pub name: String,
    /// Grams
    pub weight: u32,
    pub code: String,
    pub image: Option<String>,
}

/// A fleet unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drone {
    pub id: DroneId,
    pub serial_number: String,
    pub model: DroneModel,
    /// Grams, 0..=500
    pub weight_limit: u32,
    /// Percent, 0..=100
    pub battery_capacity: u8,
    pub state: DroneState,
    pub medications: Vec<Medication>,
}

impl Drone {
    /// Total weight of the loaded medications in grams
    pub fn payload_weight(&self) -> u64 {
        self.medications.iter().map(|m| u64::from(m.weight)).sum()
    }

    /// Idle and charged enough to take a load
    pub fn is_available(&self) -> bool {
        self.state == DroneState::Idle
            && self.battery_capacity >= limits::MIN_LOAD_BATTERY_PERCENT
    }
}

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDrone {
    pub serial_number: String,
    pub model: String,
    pub weight_limit: u32,
    pub battery_capacity: u8,
    /// Ignored: registered drones always start IDLE
    #[serde(default)]
    pub state: Option<DroneState>,
}

impl NewDrone {
    pub fn new(
        serial_number: impl Into<String>,
        model: impl Into<String>,
        weight_limit: u32,
        battery_capacity: u8,
    ) -> Self {
        Self {
            serial_number: serial_number.into(),
            model: model.into(),
            weight_limit,
            battery_capacity,
            state: None,
        }
    }

    /// Check field ranges and build the IDLE drone this request describes.
    /// Serial uniqueness is enforced by the store.
    pub fn validate(&self) -> Result<Drone, DispatchError> {
        let serial = self.serial_number.trim();
        if serial.is_empty() {
            return Err(DispatchError::Validation("serial number must not be empty".into()));
        }
        if serial.chars().count() > limits::MAX_SERIAL_LEN {
            return Err(DispatchError::Validation(format!(
                "serial number longer than {} characters",
                limits::MAX_SERIAL_LEN
            )));
        }
        let model: DroneModel = self.model.parse()?;
        if self.weight_limit > limits::MAX_WEIGHT_LIMIT_GRAMS {
            return Err(DispatchError::Validation(format!(
                "weight limit {}g exceeds {}g",
                self.weight_limit,
                limits::MAX_WEIGHT_LIMIT_GRAMS
            )));
        }
        if self.battery_capacity > limits::MAX_BATTERY_PERCENT {
            return Err(DispatchError::Validation(format!(
                "battery capacity {}% out of range",
                self.battery_capacity
            )));
        }

        Ok(Drone {
            id: Uuid::new_v4(),
            serial_number: serial.to_string(),
            model,
            weight_limit: self.weight_limit,
            battery_capacity: self.battery_capacity,
            state: DroneState::Idle,
            medications: Vec::new(),
        })
    }
}

/// Catalog insert request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedication {
    pub name: String,
    pub weight: u32,
    pub code: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewMedication {
    pub fn new(name: impl Into<String>, weight: u32, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight,
            code: code.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check name and code formats and build the record
    pub fn validate(&self) -> Result<Medication, DispatchError> {
        let name_ok = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
        let code_ok = |c: char| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_';

        if self.name.is_empty()
            || self.name.len() > limits::MAX_MEDICATION_FIELD_LEN
            || !self.name.chars().all(name_ok)
        {
            return Err(DispatchError::Validation(format!(
                "invalid medication name: {:?}",
                self.name
            )));
        }
        if self.code.is_empty()
            || self.code.len() > limits::MAX_MEDICATION_FIELD_LEN
            || !self.code.chars().all(code_ok)
        {
            return Err(DispatchError::Validation(format!(
                "invalid medication code: {:?}",
                self.code
            )));
        }

        Ok(Medication {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            weight: self.weight,
            code: self.code.clone(),
            image: self.image.clone(),
        })
    }
}

/// Explicit update request. A battery edit is a plain field write; a state
/// target is routed to the matching lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DronePatch {
    Battery(u8),
    State(DroneState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    StateChange,
    BatteryCheck,
}

/// Event payload, serialized as `{toState}`, `{from, to}` or `{batteryLevel}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum AuditMetadata {
    Transition { from: DroneState, to: DroneState },
    Registered { to_state: DroneState },
    Battery { battery_level: u8 },
}

/// Immutable audit record owned by a drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditId,
    pub drone_id: DroneId,
    pub event_type: AuditEventType,
    pub metadata: AuditMetadata,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    fn new(drone_id: DroneId, event_type: AuditEventType, metadata: AuditMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            drone_id,
            event_type,
            metadata,
            created_at: crate::now(),
        }
    }

    pub fn registered(drone_id: DroneId) -> Self {
        Self::new(
            drone_id,
            AuditEventType::StateChange,
            AuditMetadata::Registered { to_state: DroneState::Idle },
        )
    }

    pub fn state_change(drone_id: DroneId, from: DroneState, to: DroneState) -> Self {
        Self::new(
            drone_id,
            AuditEventType::StateChange,
            AuditMetadata::Transition { from, to },
        )
    }

    pub fn battery_check(drone_id: DroneId, battery_level: u8) -> Self {
        Self::new(
            drone_id,
            AuditEventType::BatteryCheck,
            AuditMetadata::Battery { battery_level },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parse_is_case_insensitive() {
        assert_eq!("lightweight".parse::<DroneModel>().unwrap(), DroneModel::Lightweight);
        assert_eq!("HEAVYWEIGHT".parse::<DroneModel>().unwrap(), DroneModel::Heavyweight);
        assert!(matches!(
            "featherweight".parse::<DroneModel>(),
            Err(DispatchError::Validation(_))
        ));
    }

    #[test]
    fn test_new_drone_forces_idle() {
        let mut req = NewDrone::new("SN-1", "Middleweight", 200, 80);
        req.state = Some(DroneState::Delivering);
        let drone = req.validate().unwrap();
        assert_eq!(drone.state, DroneState::Idle);
        assert!(drone.medications.is_empty());
    }

    #[test]
    fn test_new_drone_range_checks() {
        assert!(NewDrone::new("SN-1", "Lightweight", 501, 50).validate().is_err());
        assert!(NewDrone::new("SN-1", "Lightweight", 500, 101).validate().is_err());
        assert!(NewDrone::new("   ", "Lightweight", 100, 50).validate().is_err());
        assert!(NewDrone::new("x".repeat(101), "Lightweight", 100, 50).validate().is_err());
        assert!(NewDrone::new("SN-1", "Lightweight", 500, 100).validate().is_ok());
    }

    #[test]
    fn test_medication_formats() {
        assert!(NewMedication::new("Ibuprofen-200", 20, "IBUP_003").validate().is_ok());
        assert!(NewMedication::new("bad name", 20, "IBUP_003").validate().is_err());
        assert!(NewMedication::new("IBUPROFEN", 20, "ibup_003").validate().is_err());
        assert!(NewMedication::new("IBUPROFEN", 20, "").validate().is_err());
    }

    #[test]
    fn test_metadata_shapes() {
        let id = Uuid::new_v4();

        let entry = AuditEntry::registered(id);
        assert_eq!(
            serde_json::to_value(&entry.metadata).unwrap(),
            serde_json::json!({ "toState": "IDLE" })
        );

        let entry = AuditEntry::state_change(id, DroneState::Idle, DroneState::Loading);
        assert_eq!(
            serde_json::to_value(&entry.metadata).unwrap(),
            serde_json::json!({ "from": "IDLE", "to": "LOADING" })
        );

        let entry = AuditEntry::battery_check(id, 42);
        assert_eq!(entry.event_type, AuditEventType::BatteryCheck);
        assert_eq!(
            serde_json::to_value(&entry.metadata).unwrap(),
            serde_json::json!({ "batteryLevel": 42 })
        );
    }

    #[test]
    fn test_availability() {
        let mut drone = NewDrone::new("SN-1", "Lightweight", 100, 25).validate().unwrap();
        assert!(drone.is_available());
        drone.battery_capacity = 24;
        assert!(!drone.is_available());
        drone.battery_capacity = 90;
        drone.state = DroneState::Loaded;
        assert!(!drone.is_available());
    }
}
