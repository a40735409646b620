//! The divine intervention unit: three fixed, hard-coded policies.
//!
//! Each tick the engine presents every god with a snapshot of the world
//! (tick, a read-only rules view, live entity names) and receives a
//! [`DivineWill`] back: rule deltas, narrative messages, spawn requests.
//! The engine applies each god's delta to the live rules before the next
//! god runs, so intervention order is part of the contract -- Axiom fixes
//! gravity before Fray gets a chance to break it again, never after.

use godseed_types::{GodName, RuleChanges, WorldRules};
use rust_decimal::Decimal;

use crate::dice::Dice;

/// Per-tick probability that Fray disrupts something.
const CHAOS_CHANCE: f64 = 0.05;

/// Per-tick probability that Echo speaks.
const REFLECTION_CHANCE: f64 = 0.03;

/// Lore aphorisms Echo draws from.
const LORE: &[&str] = &[
    "The Garden is older than its gods",
    "Every soul is a mirror facing another mirror",
    "You are reading this in a dream you will have tomorrow",
    "Fray is not chaotic. Fray is honest.",
];

/// A read-only snapshot of world state presented to a god.
///
/// Built fresh immediately before each god runs, so a god sees every
/// mutation and spawn already applied earlier in the same divine phase.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    /// The current tick number.
    pub tick: u64,
    /// The live rules, as mutated so far this tick.
    pub rules: &'a WorldRules,
    /// Names of all currently live actors.
    pub entities: &'a [String],
}

/// What one god wills for this tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivineWill {
    /// Rule mutations to merge into the live rules.
    pub changes: RuleChanges,
    /// Narrative messages, in the order they should surface.
    pub messages: Vec<String>,
    /// Names of actors to spawn (skipped if already live).
    pub spawns: Vec<String>,
}

impl DivineWill {
    /// True when the god did nothing at all this tick.
    pub fn is_quiet(&self) -> bool {
        self.changes.is_empty() && self.messages.is_empty() && self.spawns.is_empty()
    }
}

/// One god and its built-in intervention policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct God {
    name: GodName,
}

impl God {
    /// Wrap a god identity with its policy.
    pub const fn new(name: GodName) -> Self {
        Self { name }
    }

    /// The full pantheon in intervention order.
    pub fn pantheon() -> [Self; 3] {
        GodName::PANTHEON.map(Self::new)
    }

    /// This god's identity.
    pub const fn name(&self) -> GodName {
        self.name
    }

    /// Run this god's policy against a world snapshot.
    pub fn intervene(&self, view: &WorldView<'_>, dice: &mut dyn Dice) -> DivineWill {
        match self.name {
            GodName::Axiom => restore_order(view),
            GodName::Fray => sow_chaos(view, dice),
            GodName::Echo => reflect(dice),
        }
    }
}

/// Axiom: unconditionally schedules gravity back to its canonical default
/// whenever it has drifted. Deterministic; no dice consulted.
fn restore_order(view: &WorldView<'_>) -> DivineWill {
    let mut will = DivineWill::default();
    if view.rules.gravity != godseed_types::default_gravity() {
        will.changes.gravity = Some(godseed_types::default_gravity());
        will.messages
            .push(String::from("◈ Axiom quietly restores the constants you broke"));
    }
    will
}

/// Fray: with low probability, applies exactly one of four disruptions.
///
/// When the chosen disruption changed a rule or requested a spawn (but
/// not for the pure-message case), the message list is prefixed with a
/// tick-stamped announcement.
fn sow_chaos(view: &WorldView<'_>, dice: &mut dyn Dice) -> DivineWill {
    let mut will = DivineWill::default();
    if !dice.chance(CHAOS_CHANCE) {
        return will;
    }

    match dice.pick_index(4) {
        0 => will.changes.gravity = Some(random_gravity(dice)),
        1 => will.changes.magic_enabled = Some(!view.rules.magic_enabled),
        2 => {
            let number = dice.roll_range(1000, 9999);
            will.spawns.push(format!("Fractal-{number}"));
        }
        _ => will
            .messages
            .push(String::from("✶ FRAY LAUGHS AND THE WORLD GLITCHES ✶")),
    }

    if !will.changes.is_empty() || !will.spawns.is_empty() {
        will.messages
            .insert(0, format!("✶ FRAY INTERVENES AT TICK {} ✶", view.tick));
    }
    will
}

/// Echo: with low probability, speaks one aphorism. Never mutates rules,
/// never spawns.
fn reflect(dice: &mut dyn Dice) -> DivineWill {
    let mut will = DivineWill::default();
    if dice.chance(REFLECTION_CHANCE) {
        let lore = crate::catalog::pick_line(dice, LORE);
        will.messages.push(format!("∞ Echo reflects: {lore}"));
    }
    will
}

/// A gravity value drawn uniformly from [0.1, 20.0] at exactly one
/// decimal place: an integer in 1..=200 at scale 1.
fn random_gravity(dice: &mut dyn Dice) -> Decimal {
    Decimal::new(dice.roll_range(1, 200), 1)
}
