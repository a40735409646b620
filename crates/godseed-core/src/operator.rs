//! Operator control state for runtime simulation management.
//!
//! Shared state read by the tick loop and written by whatever requests a
//! stop (the Ctrl-C handler, or a bounded-run limit). The stop flag is
//! atomic so the signal handler task can set it without locks; the
//! pacing and bound values are fixed at startup from configuration.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Reason why the simulation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// An operator (usually the Ctrl-C handler) requested a stop.
    OperatorStop,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Tick interval in milliseconds.
    tick_interval_ms: u64,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,
}

impl OperatorState {
    /// Create a new operator state.
    pub const fn new(tick_interval_ms: u64, max_ticks: u64) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            tick_interval_ms,
            max_ticks,
        }
    }

    /// Request a clean simulation stop. The in-flight tick finishes and
    /// persists before the loop exits.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Get the tick interval in milliseconds.
    pub const fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Check whether the tick limit has been reached.
    ///
    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Get the configured max ticks (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }
}
