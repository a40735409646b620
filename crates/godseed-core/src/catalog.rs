//! The trait catalog: fixed, process-wide constant data mapping each
//! archetype to its idle-action repertoire and awakening probability.
//!
//! The catalog is deliberately code, not configuration -- archetypes are
//! part of the simulation's identity, and an unknown identifier is a
//! programmer error surfaced at actor construction, never defaulted.

use godseed_types::TraitKind;

use crate::dice::Dice;

/// One trait archetype's constant data.
#[derive(Debug, Clone, Copy)]
pub struct Archetype {
    /// The identifier this entry belongs to.
    pub kind: TraitKind,
    /// Candidate idle actions, drawn uniformly while dormant.
    pub idle_actions: &'static [&'static str],
    /// Per-tick probability of the one-way awakening transition.
    pub awakening_chance: f64,
}

/// Look up the catalog entry for an archetype. Total over [`TraitKind`],
/// so the catalog can never be out of sync with the identifier set.
pub const fn archetype(kind: TraitKind) -> Archetype {
    match kind {
        TraitKind::Dreamer => Archetype {
            kind,
            idle_actions: &[
                "stares into the middle distance, seeing futures that haven't arrived",
                "murmurs half-remembered prophecies",
                "traces invisible patterns in the air",
            ],
            awakening_chance: 0.002,
        },
        TraitKind::Trickster => Archetype {
            kind,
            idle_actions: &[
                "grins at a joke only they understand",
                "rearranges small objects when no one is looking",
                "speaks in riddles that accidentally contain truth",
            ],
            awakening_chance: 0.001,
        },
        TraitKind::Keeper => Archetype {
            kind,
            idle_actions: &[
                "remembers things for other people",
                "maintains the small rituals that keep the world turning",
                "catalogues the unimportant with desperate care",
            ],
            awakening_chance: 0.0005,
        },
        TraitKind::VoidTouched => Archetype {
            kind,
            idle_actions: &[
                "whispers prayers to the spaces between stars",
                "feels most at peace in absolute darkness",
                "knows thirteen names for nothingness",
            ],
            awakening_chance: 0.0015,
        },
        TraitKind::GlitchKin => Archetype {
            kind,
            idle_actions: &[
                "occasionally skips frames of existence",
                "remembers events that haven't happened yet",
                "feels most real when reality is least stable",
            ],
            // Highest awakening chance in the catalog.
            awakening_chance: 0.003,
        },
    }
}

/// Post-awakening reflections, shared by every awakened actor regardless
/// of original trait.
pub const AWAKENED_REFLECTIONS: &[&str] = &[
    "questions the nature of the tick loop",
    "feels the gods watching",
    "wonders if free will is an illusion",
];

/// Suffix appended to idle actions when magic is enabled and the tingle
/// roll succeeds.
pub const MAGIC_SUFFIX: &str = " [magic tingles in the air]";

/// Probability per dormant action of the magic suffix, given magic is on.
pub const MAGIC_TINGLE_CHANCE: f64 = 0.3;

/// Draw one entry from a static string list.
///
/// Catalog lists are non-empty constants; the empty-string fallback is
/// unreachable in practice.
pub(crate) fn pick_line(dice: &mut dyn Dice, options: &'static [&'static str]) -> &'static str {
    options
        .get(dice.pick_index(options.len()))
        .copied()
        .unwrap_or("")
}
