//! Simulation loop runner with operator controls.
//!
//! [`run_simulation`] drives the tick loop around [`World::run_tick`]:
//!
//! - **Bounded runs**: stop after `max_ticks` completed ticks
//! - **Pacing**: a fixed sleep between ticks
//! - **Clean shutdown**: the in-flight tick always finishes and persists,
//!   then a shutdown record is written, whichever way the run ends

use std::sync::Arc;

use tracing::{info, warn};

use crate::dice::Dice;
use crate::operator::{OperatorState, SimulationEndReason};
use crate::world::{TickSummary, World, WorldError};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution or the shutdown record failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Number of ticks executed by this run (not the world tick counter,
    /// which also counts previous runs).
    pub total_ticks: u64,
}

/// Run the simulation loop until a termination condition is met.
///
/// Stop requests are observed between ticks only: the tick that is
/// running when Ctrl-C lands completes and persists before the loop
/// exits. Both end paths write the shutdown record before returning.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails or the shutdown record cannot
/// be written.
pub async fn run_simulation(
    world: &mut World,
    dice: &mut dyn Dice,
    operator: &Arc<OperatorState>,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        starting_tick = world.tick(),
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        "simulation starting"
    );

    loop {
        if operator.is_stop_requested() {
            info!(final_tick = world.tick(), "operator stop requested");
            world.record_shutdown()?;
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::OperatorStop,
                final_summary: last_summary,
                total_ticks,
            });
        }

        let summary = world.run_tick(dice)?;
        total_ticks = total_ticks.saturating_add(1);

        if operator.tick_limit_reached(total_ticks) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "tick limit reached"
            );
            world.record_shutdown()?;
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        last_summary = Some(summary);

        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "simulation ended -- the garden sleeps"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            entity_count = summary.entity_count,
            gravity = %summary.rules.gravity,
            magic = summary.rules.magic_enabled,
            "final tick summary"
        );
    } else {
        warn!("simulation ended with no ticks executed");
    }
}
