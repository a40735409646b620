//! World engine, gods, actors, and tick loop for the Godseed simulation.
//!
//! This crate owns the two-phase tick cycle that drives the world: the
//! divine phase (three gods intervene against the shared rules, in fixed
//! order) followed by the actor phase (every live actor takes one
//! action), closed out by the persisted tick snapshot.
//!
//! # Modules
//!
//! - [`actor`] -- The actor decision unit: identity, one-way awakening,
//!   per-tick actions.
//! - [`catalog`] -- The hard-coded trait archetype catalog.
//! - [`config`] -- Configuration loading from `godseed-config.yaml` into
//!   strongly-typed structs.
//! - [`dice`] -- [`Dice`] randomness source trait, with a seedable real
//!   implementation and a scripted one for tests.
//! - [`gods`] -- The three divine intervention policies.
//! - [`operator`] -- Shared control state (stop flag, pacing, bounds).
//! - [`runner`] -- The bounded async simulation loop.
//! - [`world`] -- The world engine: rules, tick counter, roster.
//!
//! [`Dice`]: dice::Dice

pub mod actor;
pub mod catalog;
pub mod config;
pub mod dice;
pub mod gods;
pub mod operator;
pub mod runner;
pub mod world;

pub use actor::{Actor, ActorContext, ActorError};
pub use config::{ConfigError, SimulationConfig};
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use gods::{DivineWill, God, WorldView};
pub use operator::{OperatorState, SimulationEndReason};
pub use runner::{RunnerError, SimulationResult, log_simulation_end, run_simulation};
pub use world::{TickSummary, World, WorldError};
