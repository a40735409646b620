//! The append-only log record schema.
//!
//! Every entity (each actor, plus the reserved `world` entity) owns one
//! ordered log of [`LogRecord`] entries. The payload is a tagged variant
//! per record kind with a fixed schema, so the forward-compatible
//! append-only format stays line-oriented JSON while readers get static
//! typing.
//!
//! Records are never mutated or deleted; resume reconstructs all state by
//! scanning newest-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::LogKind;
use crate::rules::WorldRules;

/// One entry in an entity's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Wall-clock time the record was appended.
    pub timestamp: DateTime<Utc>,
    /// The kind-tagged payload.
    #[serde(flatten)]
    pub payload: LogPayload,
}

impl LogRecord {
    /// Create a record stamped with the current wall-clock time.
    pub fn now(payload: LogPayload) -> Self {
        Self {
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// The kind-tagged payload of a log record.
///
/// The serialized form carries a `kind` tag alongside the variant's
/// fields, e.g. `{"kind":"action","tick":7,"action":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogPayload {
    /// Trait assignment, written once when an actor is created (or when an
    /// explicit archetype override is applied at creation time).
    ///
    /// The archetype is persisted as its raw string identifier and parsed
    /// at actor construction, so an identifier that no longer names a
    /// catalog entry fails loudly there instead of being dropped as a
    /// corrupt line.
    Identity {
        /// The assigned trait archetype identifier (e.g. `"void-touched"`).
        archetype: String,
    },

    /// The one-way awakening transition. Written at most once per actor,
    /// immediately when the transition happens and before the awakening
    /// action is returned.
    Awakening {
        /// Always `true`; awakening never resets.
        awakened: bool,
    },

    /// One action taken by an actor on one tick. Appended on every
    /// decision, whichever branch produced the action.
    Action {
        /// The tick the action was taken on.
        tick: u64,
        /// The human-readable action line.
        action: String,
    },

    /// End-of-tick world snapshot, appended to the reserved `world` log
    /// only after both the divine and actor phases complete.
    Tick {
        /// The tick that just fully completed.
        tick: u64,
        /// The full rules mapping at end of tick.
        rules: WorldRules,
        /// Number of live actors.
        entity_count: u32,
    },

    /// Final record written when the run is cancelled or ends cleanly.
    Shutdown {
        /// The last fully completed tick.
        final_tick: u64,
        /// Wall-clock shutdown time.
        shutdown_at: DateTime<Utc>,
    },
}

impl LogPayload {
    /// The kind tag of this payload.
    pub const fn kind(&self) -> LogKind {
        match self {
            Self::Identity { .. } => LogKind::Identity,
            Self::Awakening { .. } => LogKind::Awakening,
            Self::Action { .. } => LogKind::Action,
            Self::Tick { .. } => LogKind::Tick,
            Self::Shutdown { .. } => LogKind::Shutdown,
        }
    }
}
