//! Paginated drone and medication listings

use super::filter::{DroneFilter, MedicationFilter};
use crate::catalog::MedicationCatalog;
use crate::store::FleetStore;
use dispatch_shared::{DispatchError, Drone, Medication, Page, PageRequest};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Read-only queries over the fleet and the catalog
#[derive(Clone)]
pub struct FleetQuery {
    store: Arc<dyn FleetStore>,
    catalog: Arc<dyn MedicationCatalog>,
}

impl FleetQuery {
    pub fn new(store: Arc<dyn FleetStore>, catalog: Arc<dyn MedicationCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Drones matching `filter`, ordered by serial number
    pub async fn find_drones(
        &self,
        filter: &DroneFilter,
        page: PageRequest,
    ) -> Result<Page<Drone>, DispatchError> {
        page.validate()?;

        let mut drones: Vec<Drone> = self
            .store
            .list_drones()
            .await?
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect();
        drones.sort_by(|a, b| a.serial_number.cmp(&b.serial_number));

        let result = page.apply(drones);
        debug!(
            "[QUERY] drones {:?}: page {}/{} ({} total)",
            filter, result.meta.page, result.meta.total_pages, result.meta.total
        );
        Ok(result)
    }

    /// Catalog entries, optionally only those loaded on one drone, ordered by code
    pub async fn find_medications(
        &self,
        filter: &MedicationFilter,
        page: PageRequest,
    ) -> Result<Page<Medication>, DispatchError> {
        page.validate()?;

        let mut medications = self.catalog.list_medications().await?;

        if let Some(drone_id) = filter.drone_id {
            let drone = self
                .store
                .get_drone(&drone_id)
                .await?
                .ok_or_else(|| DispatchError::NotFound(format!("Drone {drone_id} not found")))?;
            let loaded: HashSet<_> = drone.medications.iter().map(|m| m.id).collect();
            medications.retain(|m| loaded.contains(&m.id));
        }
        medications.sort_by(|a, b| a.code.cmp(&b.code));

        Ok(page.apply(medications))
    }
}
