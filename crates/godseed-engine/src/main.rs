//! Launcher binary for the Godseed simulation.
//!
//! Entry point that wires together the log store, the world engine, the
//! three gods, and operator controls, then runs the tick loop until
//! Ctrl-C or the configured tick limit.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `godseed-config.yaml`
//! 3. Open the log store and the world (recovering the tick counter)
//! 4. Bootstrap the roster (genesis starters, or resume from logs)
//! 5. Wire Ctrl-C to the operator stop flag
//! 6. Run the simulation loop
//! 7. Log the result

mod bootstrap;
mod error;

use std::path::Path;
use std::sync::Arc;

use godseed_core::config::SimulationConfig;
use godseed_core::dice::RandomDice;
use godseed_core::operator::OperatorState;
use godseed_core::runner;
use godseed_core::world::World;
use godseed_store::LogStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::bootstrap::Bootstrap;
use crate::error::EngineError;

/// Application entry point for the world engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself
/// fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("godseed-engine starting");

    let config = load_config()?;
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        data_dir = config.world.data_dir,
        max_ticks = config.simulation.max_ticks,
        "configuration loaded"
    );

    let store = LogStore::open(Path::new(&config.world.data_dir))?;
    let mut world = World::open(store.clone())?;

    let mut dice = config
        .world
        .seed
        .map_or_else(RandomDice::from_entropy, RandomDice::seeded);

    match bootstrap::populate(&mut world, &store, &mut dice)? {
        Bootstrap::Genesis => info!("the garden wakes for the first time"),
        Bootstrap::Resume => info!(tick = world.tick(), "the garden remembers"),
    }

    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        config.simulation.max_ticks,
    ));

    // Ctrl-C requests a stop; the in-flight tick finishes and persists.
    let signal_operator = Arc::clone(&operator);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current tick");
                signal_operator.request_stop();
            }
            Err(error) => {
                warn!(%error, "failed to listen for Ctrl-C");
            }
        }
    });

    let result = runner::run_simulation(&mut world, &mut dice, &operator).await?;
    runner::log_simulation_end(&result);

    info!(
        end_reason = ?result.end_reason,
        final_tick = world.tick(),
        "godseed-engine shutdown complete"
    );
    Ok(())
}

/// Load the simulation configuration from `godseed-config.yaml`.
///
/// Looks for the config file relative to the current working directory;
/// a missing file means defaults.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new("godseed-config.yaml");
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        info!("config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}
