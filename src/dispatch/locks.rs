//! Per-drone mutual exclusion for multi-step mutations

use dispatch_shared::DroneId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per drone id, created on first use
#[derive(Default)]
pub struct DroneLocks {
    locks: Mutex<HashMap<DroneId, Arc<Mutex<()>>>>,
}

impl DroneLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a drone. The guard releases on drop.
    pub async fn acquire(&self, id: DroneId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of drones that have been locked at least once
    #[cfg(test)]
    pub(crate) async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_shared::Uuid;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_drone_is_exclusive() {
        let locks = Arc::new(DroneLocks::new());
        let id = Uuid::new_v4();

        let guard = locks.acquire(id).await;
        let locks_clone = locks.clone();
        let waiter = tokio::spawn(async move {
            let _g = locks_clone.acquire(id).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_drones_do_not_block() {
        let locks = DroneLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        let _b = locks.acquire(Uuid::new_v4()).await;
        assert_eq!(locks.tracked().await, 2);
    }
}
