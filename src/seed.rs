//! Demo catalog and fleet

use crate::catalog::MemoryCatalog;
use crate::dispatch::DispatchService;
use dispatch_shared::{DispatchError, DroneModel, NewDrone, NewMedication};
use tracing::info;

const DEMO_MEDICATIONS: [(&str, u32, &str); 4] = [
    ("PARACETAMOL", 50, "PARA_001"),
    ("AMOXICILLIN", 30, "AMOX_002"),
    ("IBUPROFEN", 20, "IBUP_003"),
    ("VITAMIN_C", 10, "VITC_004"),
];

const DEMO_WEIGHT_LIMITS: [u32; 10] = [100, 200, 300, 400, 120, 220, 320, 420, 140, 240];
const DEMO_BATTERIES: [u8; 10] = [100, 90, 80, 70, 60, 50, 40, 30, 25, 20];

/// Register four medications and ten idle drones.
///
/// Drones go through normal registration, so each gets its audit entry.
pub async fn seed_demo_fleet(
    dispatch: &DispatchService,
    catalog: &MemoryCatalog,
) -> Result<(), DispatchError> {
    for (name, weight, code) in DEMO_MEDICATIONS {
        let tag = &code[..4];
        catalog
            .insert(
                NewMedication::new(name, weight, code)
                    .with_image(format!("https://dummyimage.com/100x100/000/fff&text={tag}")),
            )
            .await?;
    }

    let fleet = DEMO_WEIGHT_LIMITS.into_iter().zip(DEMO_BATTERIES);
    for (i, (weight_limit, battery)) in fleet.enumerate() {
        let model = DroneModel::ALL[i % DroneModel::ALL.len()];
        dispatch
            .register(NewDrone::new(
                format!("DRONE{:03}", i + 1),
                model.as_str(),
                weight_limit,
                battery,
            ))
            .await?;
    }

    info!(
        "Seeded {} medications and {} drones",
        DEMO_MEDICATIONS.len(),
        DEMO_WEIGHT_LIMITS.len()
    );
    Ok(())
}
