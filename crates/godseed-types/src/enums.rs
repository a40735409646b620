//! Enumeration types for the Godseed simulation.
//!
//! Trait archetype identifiers, the fixed pantheon of god identities, and
//! the tag set for per-entity log records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Trait archetypes
// ---------------------------------------------------------------------------

/// A persisted trait identifier that does not name any known archetype.
///
/// Raised when reconstructing an actor from a log whose identity record
/// carries an unrecognized trait string. This is a configuration error and
/// is never silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trait archetype: {0}")]
pub struct UnknownTraitError(pub String);

/// A personality trait archetype.
///
/// Every actor carries exactly one archetype, assigned once at creation
/// and immutable thereafter. The archetype determines the actor's idle
/// action repertoire and its per-tick awakening probability (both defined
/// in the core crate's trait catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraitKind {
    /// Sees futures that have not arrived; highest-minded, mid awakening odds.
    Dreamer,
    /// Speaks in riddles and rearranges small objects.
    Trickster,
    /// Maintains rituals and catalogues the unimportant.
    Keeper,
    /// At peace in darkness; prays to the spaces between stars.
    VoidTouched,
    /// Skips frames of existence; most likely of all to awaken.
    GlitchKin,
}

impl TraitKind {
    /// All archetypes, in catalog order. Used for uniform random assignment.
    pub const ALL: [Self; 5] = [
        Self::Dreamer,
        Self::Trickster,
        Self::Keeper,
        Self::VoidTouched,
        Self::GlitchKin,
    ];

    /// The stable string identifier persisted in identity records.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Dreamer => "dreamer",
            Self::Trickster => "trickster",
            Self::Keeper => "keeper",
            Self::VoidTouched => "void-touched",
            Self::GlitchKin => "glitch-kin",
        }
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TraitKind {
    type Err = UnknownTraitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownTraitError(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Gods
// ---------------------------------------------------------------------------

/// The fixed alignment of a god. Informational; the intervention policy
/// itself is hard-coded per god in the core crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Restores broken constants.
    Order,
    /// Randomizes rules, spawns anomalies.
    Chaos,
    /// Weaves lore; never touches the rules.
    Reflection,
}

/// Identity of one of the three gods watching the world.
///
/// The pantheon is closed: there are exactly three gods, and they always
/// intervene in the order Axiom, Fray, Echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GodName {
    /// The order god. Unconditionally restores gravity to its default.
    Axiom,
    /// The chaos god. Occasionally breaks one thing per tick.
    Fray,
    /// The reflection god. Occasionally speaks a line of lore.
    Echo,
}

impl GodName {
    /// The pantheon in intervention order. Order matters: later gods see
    /// rule mutations already applied by earlier gods in the same tick.
    pub const PANTHEON: [Self; 3] = [Self::Axiom, Self::Fray, Self::Echo];

    /// The god's fixed alignment label.
    pub const fn alignment(self) -> Alignment {
        match self {
            Self::Axiom => Alignment::Order,
            Self::Fray => Alignment::Chaos,
            Self::Echo => Alignment::Reflection,
        }
    }
}

impl fmt::Display for GodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Axiom => "Axiom",
            Self::Fray => "Fray",
            Self::Echo => "Echo",
        };
        f.write_str(name)
    }
}

impl FromStr for GodName {
    type Err = UnknownGodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "axiom" => Ok(Self::Axiom),
            "fray" => Ok(Self::Fray),
            "echo" => Ok(Self::Echo),
            other => Err(UnknownGodError(other.to_owned())),
        }
    }
}

/// A god name string that does not name any member of the pantheon.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown god: {0} (the pantheon is Axiom, Fray, Echo)")]
pub struct UnknownGodError(pub String);

// ---------------------------------------------------------------------------
// Log record kinds
// ---------------------------------------------------------------------------

/// The tag identifying what kind of record a log entry is.
///
/// Mirrors the variants of [`crate::records::LogPayload`]; used for
/// kind-filtered queries against an entity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Trait assignment at actor creation.
    Identity,
    /// The one-way awakening transition.
    Awakening,
    /// One action taken on one tick.
    Action,
    /// End-of-tick world snapshot (world log only).
    Tick,
    /// Final record written on cancellation (world log only).
    Shutdown,
}
