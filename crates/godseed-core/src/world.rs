//! The world engine: rules, tick counter, live actors, and the two-phase
//! tick cycle.
//!
//! Each tick runs two macro-phases, always both:
//!
//! 1. **Divine phase** -- each god intervenes in pantheon order against a
//!    snapshot built fresh for it; rule deltas are applied and spawns
//!    materialized immediately as each god completes, not batched.
//! 2. **Actor phase** -- every actor live at the start of the phase acts
//!    once, in roster (spawn) order. Actors spawned during this tick's
//!    divine phase do act this tick.
//!
//! Only after both phases does the engine append the tick snapshot to the
//! world log, so the persisted tick number always names the last *fully
//! completed* tick -- a crash mid-tick loses the in-progress tick and
//! nothing else.

use std::collections::BTreeMap;

use godseed_store::{EntityLog, LogStore, StoreError};
use godseed_types::{LogPayload, TraitKind, WorldRules};
use tracing::info;

use crate::actor::{Actor, ActorContext, ActorError};
use crate::dice::Dice;
use crate::gods::{God, WorldView};

/// Errors raised by world construction or tick execution.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A log operation failed. Fatal: persisted history is the source of
    /// truth on resume.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// An actor failed to construct or act.
    #[error("actor {name}: {source}")]
    Actor {
        /// The actor that failed.
        name: String,
        /// The underlying actor error.
        source: ActorError,
    },

    /// The tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Summary of one completed tick.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that just completed.
    pub tick: u64,
    /// The rules as they stand at end of tick.
    pub rules: WorldRules,
    /// Number of live actors at end of tick.
    pub entity_count: u32,
    /// God messages and spawn lines, in the order they surfaced.
    pub narrative: Vec<String>,
    /// Each actor's action this tick, in roster order.
    pub actions: Vec<(String, String)>,
}

/// The persistent, god-influenced world.
#[derive(Debug)]
pub struct World {
    store: LogStore,
    log: EntityLog,
    rules: WorldRules,
    tick: u64,
    actors: BTreeMap<String, Actor>,
    roster: Vec<String>,
    gods: [God; 3],
}

impl World {
    /// Open the world against a log store, recovering the tick counter
    /// from the last persisted tick snapshot (0 means genesis).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Store`] if the world log cannot be opened.
    pub fn open(store: LogStore) -> Result<Self, WorldError> {
        let log = store.world_log()?;
        let tick = log.latest_or(
            |p| match p {
                LogPayload::Tick { tick, .. } => Some(*tick),
                _ => None,
            },
            0,
        );

        info!(starting_tick = tick, "world engine initialized");

        Ok(Self {
            store,
            log,
            rules: WorldRules::default(),
            tick,
            actors: BTreeMap::new(),
            roster: Vec::new(),
            gods: God::pantheon(),
        })
    }

    /// The last fully completed tick (0 before any tick has run).
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The current world rules.
    pub const fn rules(&self) -> &WorldRules {
        &self.rules
    }

    /// Live actor names, in spawn order.
    pub fn actor_names(&self) -> &[String] {
        &self.roster
    }

    /// Look up a live actor by name.
    pub fn actor(&self, name: &str) -> Option<&Actor> {
        self.actors.get(name)
    }

    /// True when no tick has ever been persisted: the starter roster
    /// should be spawned rather than resumed.
    pub const fn is_genesis(&self) -> bool {
        self.tick == 0
    }

    /// Spawn an actor by name, idempotently.
    ///
    /// A name that is already live is skipped: no duplicate actor, no log
    /// reset, and `Ok(false)` is returned. Otherwise the actor is
    /// constructed (recovering persisted state if its log exists) and
    /// announced.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Actor`] if construction fails.
    pub fn spawn(
        &mut self,
        name: &str,
        forced: Option<TraitKind>,
        dice: &mut dyn Dice,
    ) -> Result<bool, WorldError> {
        if self.actors.contains_key(name) {
            return Ok(false);
        }

        let actor = Actor::load_or_create(&self.store, name, forced, dice).map_err(|source| {
            WorldError::Actor {
                name: name.to_owned(),
                source,
            }
        })?;

        info!(
            actor = name,
            archetype = %actor.trait_kind(),
            "✶ {name} ({}) tears through reality",
            actor.trait_kind()
        );
        self.roster.push(name.to_owned());
        self.actors.insert(name.to_owned(), actor);
        Ok(true)
    }

    /// Execute one complete tick: divine phase, actor phase, then the
    /// world snapshot append.
    ///
    /// The tick counter is incremented at the start, so both phases
    /// observe the new tick number; the snapshot is only written after
    /// both phases complete.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the counter overflows, an actor fails,
    /// or any record cannot be persisted.
    pub fn run_tick(&mut self, dice: &mut dyn Dice) -> Result<TickSummary, WorldError> {
        self.tick = self.tick.checked_add(1).ok_or(WorldError::TickOverflow)?;
        let tick = self.tick;

        info!(
            tick,
            gravity = %self.rules.gravity,
            magic = self.rules.magic_enabled,
            "═══ TICK {tick} ═══"
        );

        let mut narrative = Vec::new();

        // --- Divine phase ---
        for god in self.gods {
            // Snapshot built per god: later gods see earlier mutations.
            let will = {
                let view = WorldView {
                    tick,
                    rules: &self.rules,
                    entities: &self.roster,
                };
                god.intervene(&view, dice)
            };

            self.rules.apply(&will.changes);

            for message in will.messages {
                info!(god = %god.name(), "{message}");
                narrative.push(message);
            }

            for spawn_name in will.spawns {
                if self.spawn(&spawn_name, None, dice)? {
                    narrative.push(format!("✶ {spawn_name} tears through reality"));
                }
            }
        }

        // --- Actor phase ---
        // Roster captured at phase start: same-tick divine spawns act,
        // and nothing is ever removed mid-run.
        let order = self.roster.clone();
        let ctx = ActorContext {
            tick,
            magic_enabled: self.rules.magic_enabled,
        };

        let mut actions = Vec::with_capacity(order.len());
        for name in order {
            let Some(actor) = self.actors.get_mut(&name) else {
                continue;
            };
            let action = actor.act(&ctx, dice).map_err(|source| WorldError::Actor {
                name: name.clone(),
                source,
            })?;
            info!(actor = %name, "{action}");
            actions.push((name, action));
        }

        // --- Persist the completed tick ---
        let entity_count = u32::try_from(self.roster.len()).unwrap_or(u32::MAX);
        self.log.append(LogPayload::Tick {
            tick,
            rules: self.rules.clone(),
            entity_count,
        })?;

        Ok(TickSummary {
            tick,
            rules: self.rules.clone(),
            entity_count,
            narrative,
            actions,
        })
    }

    /// Append the final shutdown record, naming the last completed tick.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Store`] if the record cannot be written.
    pub fn record_shutdown(&mut self) -> Result<(), WorldError> {
        self.log.append(LogPayload::Shutdown {
            final_tick: self.tick,
            shutdown_at: chrono::Utc::now(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use godseed_types::LogKind;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::dice::ScriptedDice;

    fn world() -> (tempfile::TempDir, World) {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path()).unwrap();
        let world = World::open(store).unwrap();
        (dir, world)
    }

    fn spawn_starter(world: &mut World) {
        let mut dice = ScriptedDice::default();
        assert!(world.spawn("Eyla", Some(TraitKind::Keeper), &mut dice).unwrap());
        assert!(world.spawn("Korr", Some(TraitKind::Trickster), &mut dice).unwrap());
    }

    #[test]
    fn fresh_world_is_genesis_at_tick_zero() {
        let (_dir, world) = world();
        assert!(world.is_genesis());
        assert_eq!(world.tick(), 0);
        assert_eq!(world.rules(), &WorldRules::default());
    }

    #[test]
    fn spawn_is_idempotent_by_name() {
        let (_dir, mut world) = world();
        let mut dice = ScriptedDice::default();
        assert!(world.spawn("Eyla", Some(TraitKind::Keeper), &mut dice).unwrap());
        assert!(!world.spawn("Eyla", Some(TraitKind::Keeper), &mut dice).unwrap());
        assert_eq!(world.actor_names(), &[String::from("Eyla")]);
    }

    #[test]
    fn tick_increments_by_exactly_one() {
        let (_dir, mut world) = world();
        spawn_starter(&mut world);
        for expected in 1..=5 {
            let mut dice = ScriptedDice::default();
            let summary = world.run_tick(&mut dice).unwrap();
            assert_eq!(summary.tick, expected);
            assert_eq!(world.tick(), expected);
        }
    }

    #[test]
    fn quiet_tick_persists_one_snapshot() {
        let (dir, mut world) = world();
        spawn_starter(&mut world);

        let mut dice = ScriptedDice::default();
        let summary = world.run_tick(&mut dice).unwrap();
        assert_eq!(summary.entity_count, 2);
        assert!(summary.narrative.is_empty());
        assert_eq!(summary.actions.len(), 2);

        let store = LogStore::open(dir.path()).unwrap();
        let log = store.world_log().unwrap();
        let ticks = log.recent(LogKind::Tick, 10);
        assert_eq!(ticks.len(), 1);
        assert!(matches!(
            ticks.first().map(|r| &r.payload),
            Some(LogPayload::Tick {
                tick: 1,
                entity_count: 2,
                ..
            })
        ));
    }

    #[test]
    fn axioms_fix_lands_before_fray_rolls() {
        let (_dir, mut world) = world();
        spawn_starter(&mut world);

        // Drift gravity by letting Fray break it first:
        // Fray triggers (0.01), branch 0, raw 33 -> 3.3. Echo quiet (0.9).
        // Actor rolls: high (no awakening), idle picks default.
        let mut dice = ScriptedDice::default()
            .with_rolls([0.01, 0.9, 0.9, 0.9, 0.9, 0.9])
            .with_indices([0])
            .with_ranges([33]);
        let summary = world.run_tick(&mut dice).unwrap();
        assert_eq!(summary.rules.gravity, dec!(3.3));

        // Next tick: Axiom restores before Fray (quiet) runs; end of tick
        // gravity is canonical again.
        let mut dice = ScriptedDice::default().with_rolls([0.9, 0.9, 0.9, 0.9, 0.9]);
        let summary = world.run_tick(&mut dice).unwrap();
        assert_eq!(summary.rules.gravity, dec!(9.8));
        assert!(
            summary
                .narrative
                .iter()
                .any(|m| m.contains("Axiom quietly restores"))
        );
    }

    #[test]
    fn fray_can_override_axiom_within_the_same_tick() {
        let (_dir, mut world) = world();
        spawn_starter(&mut world);

        // Tick 1: Fray breaks gravity to 3.3.
        let mut dice = ScriptedDice::default()
            .with_rolls([0.01, 0.9, 0.9, 0.9, 0.9, 0.9])
            .with_indices([0])
            .with_ranges([33]);
        let _ = world.run_tick(&mut dice).unwrap();

        // Tick 2: Axiom restores to 9.8, then Fray re-breaks to 0.5 in the
        // very same tick. Order is the contract: the end state is Fray's.
        let mut dice = ScriptedDice::default()
            .with_rolls([0.01, 0.9, 0.9, 0.9, 0.9, 0.9])
            .with_indices([0])
            .with_ranges([5]);
        let summary = world.run_tick(&mut dice).unwrap();
        assert_eq!(summary.rules.gravity, dec!(0.5));
        assert!(
            summary
                .narrative
                .iter()
                .any(|m| m.contains("Axiom quietly restores"))
        );
    }

    #[test]
    fn divine_spawns_act_in_the_same_tick() {
        let (_dir, mut world) = world();
        spawn_starter(&mut world);

        // Fray triggers, branch 2 (spawn), name roll 4242. The fresh
        // Fractal needs a trait pick (index 0 -> dreamer). Echo quiet.
        let mut dice = ScriptedDice::default()
            .with_rolls([0.01, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9])
            .with_indices([2, 0])
            .with_ranges([4242]);
        let summary = world.run_tick(&mut dice).unwrap();

        assert_eq!(summary.entity_count, 3);
        assert!(world.actor("Fractal-4242").is_some());
        assert!(
            summary
                .actions
                .iter()
                .any(|(name, _)| name == "Fractal-4242")
        );
    }

    #[test]
    fn duplicate_divine_spawn_leaves_roster_unchanged() {
        let (_dir, mut world) = world();
        let mut dice = ScriptedDice::default().with_indices([0]);
        assert!(world.spawn("Fractal-4242", None, &mut dice).unwrap());

        let mut dice = ScriptedDice::default()
            .with_rolls([0.01, 0.9, 0.9, 0.9])
            .with_indices([2])
            .with_ranges([4242]);
        let summary = world.run_tick(&mut dice).unwrap();
        assert_eq!(summary.entity_count, 1);
        assert_eq!(world.actor_names().len(), 1);
    }

    #[test]
    fn resume_starts_after_the_last_completed_tick() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = LogStore::open(dir.path()).unwrap();
            let mut world = World::open(store).unwrap();
            spawn_starter(&mut world);
            for _ in 0..3 {
                let mut dice = ScriptedDice::default();
                let _ = world.run_tick(&mut dice).unwrap();
            }
            world.record_shutdown().unwrap();
        }

        let store = LogStore::open(dir.path()).unwrap();
        let mut world = World::open(store).unwrap();
        assert!(!world.is_genesis());
        assert_eq!(world.tick(), 3);

        // Reconstruct the roster the way the launcher does on resume.
        let names = {
            let store = LogStore::open(dir.path()).unwrap();
            store.entity_names().unwrap()
        };
        let mut dice = ScriptedDice::default();
        for name in &names {
            let _ = world.spawn(name, None, &mut dice).unwrap();
        }
        assert_eq!(world.actor_names().len(), 2);
        assert_eq!(
            world.actor("Eyla").map(Actor::trait_kind),
            Some(TraitKind::Keeper)
        );
        assert_eq!(
            world.actor("Korr").map(Actor::trait_kind),
            Some(TraitKind::Trickster)
        );

        let mut dice = ScriptedDice::default();
        let summary = world.run_tick(&mut dice).unwrap();
        assert_eq!(summary.tick, 4);
    }

    #[test]
    fn unwritable_world_log_fails_the_tick() {
        let (dir, mut world) = world();
        spawn_starter(&mut world);
        // A directory squatting on the world log path makes the snapshot
        // append fail; the tick must surface that, not swallow it.
        std::fs::create_dir(dir.path().join("memory_world.jsonl")).unwrap();

        let mut dice = ScriptedDice::default();
        let result = world.run_tick(&mut dice);
        assert!(matches!(result, Err(WorldError::Store { .. })));
    }

    #[test]
    fn shutdown_record_names_the_last_completed_tick() {
        let (dir, mut world) = world();
        spawn_starter(&mut world);
        let mut dice = ScriptedDice::default();
        let _ = world.run_tick(&mut dice).unwrap();
        world.record_shutdown().unwrap();

        let store = LogStore::open(dir.path()).unwrap();
        let log = store.world_log().unwrap();
        let shutdowns = log.recent(LogKind::Shutdown, 10);
        assert_eq!(shutdowns.len(), 1);
        assert!(matches!(
            shutdowns.first().map(|r| &r.payload),
            Some(LogPayload::Shutdown { final_tick: 1, .. })
        ));
    }
}
