use crate::audit::AuditRecorder;
use crate::store::FleetStore;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub recorded: usize,
    pub failed: usize,
}

/// Periodic battery audit over the whole fleet
pub struct BatterySweep {
    store: Arc<dyn FleetStore>,
    audit: AuditRecorder,
    period: Duration,
}

impl BatterySweep {
    pub fn new(store: Arc<dyn FleetStore>, period: Duration) -> Self {
        Self {
            audit: AuditRecorder::new(store.clone()),
            store,
            period,
        }
    }

    /// Write one BATTERY_CHECK entry per drone.
    ///
    /// A failed write for one drone is logged and the sweep carries on.
    /// Drone state is never modified.
    pub async fn handle_battery_audit(&self) -> SweepReport {
        let drones = match self.store.list_drones().await {
            Ok(drones) => drones,
            Err(e) => {
                error!("[SWEEP] Failed to list drones: {}", e);
                return SweepReport::default();
            }
        };

        let results = join_all(drones.iter().map(|d| self.audit.record_battery(d))).await;

        let mut report = SweepReport::default();
        for (drone, result) in drones.iter().zip(results) {
            match result {
                Ok(_) => report.recorded += 1,
                Err(e) => {
                    warn!(
                        "[SWEEP] Battery check for {} not recorded: {}",
                        drone.serial_number, e
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            "[SWEEP] Battery audit: {} recorded, {} failed",
            report.recorded, report.failed
        );
        report
    }

    /// Start the sweep loop. The first sweep runs one full period after start.
    pub fn start(self: Arc<Self>) -> SweepHandle {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.handle_battery_audit().await;
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }

            info!("[SWEEP] Battery sweep stopped");
        });

        info!("[SWEEP] Battery sweep started (every {:?})", period);
        SweepHandle { shutdown_tx, task }
    }
}

/// Handle to stop the sweep loop
pub struct SweepHandle {
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signal the loop to stop and wait for it to exit
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            error!("[SWEEP] Sweep task ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use async_trait::async_trait;
    use dispatch_shared::{
        AuditEntry, AuditEventType, AuditMetadata, Drone, DroneId, DroneState, NewDrone,
    };

    async fn register(store: &MemoryStore, serial: &str, battery: u8) -> Drone {
        let drone = NewDrone::new(serial, "Lightweight", 100, battery)
            .validate()
            .unwrap();
        store
            .insert_drone(&drone, &AuditEntry::registered(drone.id))
            .await
            .unwrap();
        drone
    }

    fn battery_entries(trail: &[AuditEntry]) -> Vec<AuditMetadata> {
        trail
            .iter()
            .filter(|e| e.event_type == AuditEventType::BatteryCheck)
            .map(|e| e.metadata.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_sweep_records_every_drone() {
        let store = Arc::new(MemoryStore::new());
        let a = register(&store, "DRONE001", 100).await;
        let b = register(&store, "DRONE002", 35).await;

        let sweep = BatterySweep::new(store.clone(), Duration::from_secs(3600));
        let report = sweep.handle_battery_audit().await;
        assert_eq!(report, SweepReport { recorded: 2, failed: 0 });

        let trail = store.audit_for(&b.id).await.unwrap();
        assert_eq!(battery_entries(&trail), vec![AuditMetadata::Battery { battery_level: 35 }]);

        let stored = store.get_drone(&a.id).await.unwrap().unwrap();
        assert_eq!(stored.state, DroneState::Idle);
        assert_eq!(stored, a);
    }

    /// Store whose audit appends fail for one drone
    struct FlakyAudit {
        inner: MemoryStore,
        broken: DroneId,
    }

    #[async_trait]
    impl FleetStore for FlakyAudit {
        async fn insert_drone(&self, d: &Drone, e: &AuditEntry) -> Result<(), StoreError> {
            self.inner.insert_drone(d, e).await
        }
        async fn get_drone(&self, id: &DroneId) -> Result<Option<Drone>, StoreError> {
            self.inner.get_drone(id).await
        }
        async fn list_drones(&self) -> Result<Vec<Drone>, StoreError> {
            self.inner.list_drones().await
        }
        async fn save_drone(&self, d: &Drone) -> Result<(), StoreError> {
            self.inner.save_drone(d).await
        }
        async fn commit_transition(&self, d: &Drone, e: &AuditEntry) -> Result<(), StoreError> {
            self.inner.commit_transition(d, e).await
        }
        async fn append_audit(&self, e: &AuditEntry) -> Result<(), StoreError> {
            if e.drone_id == self.broken {
                return Err(StoreError::Backend("write timed out".into()));
            }
            self.inner.append_audit(e).await
        }
        async fn audit_for(&self, id: &DroneId) -> Result<Vec<AuditEntry>, StoreError> {
            self.inner.audit_for(id).await
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_sweep() {
        let inner = MemoryStore::new();
        let broken = register(&inner, "DRONE001", 90).await;
        let healthy = register(&inner, "DRONE002", 80).await;
        let also_healthy = register(&inner, "DRONE003", 70).await;
        let store = Arc::new(FlakyAudit { inner, broken: broken.id });

        let sweep = BatterySweep::new(store.clone(), Duration::from_secs(3600));
        let report = sweep.handle_battery_audit().await;
        assert_eq!(report, SweepReport { recorded: 2, failed: 1 });

        for drone in [&healthy, &also_healthy] {
            let trail = store.audit_for(&drone.id).await.unwrap();
            assert_eq!(battery_entries(&trail).len(), 1);
        }
        let trail = store.audit_for(&broken.id).await.unwrap();
        assert!(battery_entries(&trail).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_ticks_and_stop() {
        let store = Arc::new(MemoryStore::new());
        let drone = register(&store, "DRONE001", 60).await;

        let sweep = Arc::new(BatterySweep::new(store.clone(), Duration::from_secs(3600)));
        let handle = sweep.start();

        // Let the loop consume its immediate first tick
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_secs(3600 * 2 + 1)).await;

        handle.stop().await;
        let count = battery_entries(&store.audit_for(&drone.id).await.unwrap()).len();
        assert_eq!(count, 2);

        // Nothing runs after stop
        tokio::time::sleep(Duration::from_secs(3600 * 3)).await;
        let after = battery_entries(&store.audit_for(&drone.id).await.unwrap()).len();
        assert_eq!(after, count);
    }
}
