use anyhow::Context;
use dispatch_shared::PageRequest;
use drone_dispatch::{
    seed, shutdown, BatterySweep, DispatchConfig, DispatchService, DroneFilter, FleetQuery,
    MemoryCatalog, MemoryStore, StateFilter,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DispatchConfig::load().context("loading configuration")?;

    // Initialize tracing; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("Drone dispatch starting");
    info!("  Battery sweep interval: {:?}", config.sweep_interval());

    let store = Arc::new(MemoryStore::new());
    let catalog = Arc::new(MemoryCatalog::new());
    let dispatch = DispatchService::new(store.clone(), catalog.clone());
    let query = FleetQuery::new(store.clone(), catalog.clone());

    if config.seed_demo_fleet {
        seed::seed_demo_fleet(&dispatch, &catalog)
            .await
            .context("seeding demo fleet")?;

        let available = DroneFilter {
            state: Some(StateFilter::Available),
            model: None,
        };
        let page = query
            .find_drones(&available, PageRequest::default())
            .await?;
        info!("  {} drones available for loading", page.meta.total);
    }

    let sweep = Arc::new(BatterySweep::new(store.clone(), config.sweep_interval()));
    let sweep_handle = sweep.start();

    shutdown::wait_for_shutdown_signal()
        .await
        .context("installing signal handlers")?;

    sweep_handle.stop().await;
    info!("Drone dispatch stopped");
    Ok(())
}
