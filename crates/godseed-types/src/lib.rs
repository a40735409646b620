//! Shared type definitions for the Godseed simulation.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries: trait archetype identifiers, god identities, world rules,
//! rule-change deltas, and the tagged per-entity log record schema.
//!
//! # Modules
//!
//! - [`enums`] -- Trait archetypes, god identities, log record kinds
//! - [`rules`] -- Shared world rules and the deltas gods apply to them
//! - [`records`] -- The append-only log record schema (one tagged variant
//!   per record kind)

pub mod enums;
pub mod records;
pub mod rules;

pub use enums::{Alignment, GodName, LogKind, TraitKind, UnknownGodError, UnknownTraitError};
pub use records::{LogPayload, LogRecord};
pub use rules::{DAY_CYCLE_MINUTES, RuleChanges, WorldRules, default_gravity};
