//! Genesis and resume bootstrap.
//!
//! A fresh world (no tick snapshot in the world log) gets the starter
//! roster. A resumed world re-spawns every entity discovered in the data
//! directory; each actor's trait and awakened flag come back from its own
//! log, so the roster and all state survive restarts.

use godseed_core::dice::Dice;
use godseed_core::world::World;
use godseed_store::LogStore;
use godseed_types::TraitKind;
use tracing::info;

use crate::error::EngineError;

/// The souls every fresh world starts with.
const STARTER_ROSTER: [(&str, TraitKind); 3] = [
    ("Eyla the Herbalist", TraitKind::Keeper),
    ("Korr the Smith", TraitKind::Trickster),
    ("The-One-Who-Watches", TraitKind::Dreamer),
];

/// Which bootstrap path ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// Fresh world: the starter roster was created.
    Genesis,
    /// Existing world: entities were recovered from their logs.
    Resume,
}

/// Populate the world's roster, creating the starter souls on a fresh
/// world or recovering every persisted entity otherwise.
///
/// # Errors
///
/// Returns [`EngineError`] if discovery or any spawn fails.
pub fn populate(
    world: &mut World,
    store: &LogStore,
    dice: &mut dyn Dice,
) -> Result<Bootstrap, EngineError> {
    if world.is_genesis() {
        info!("genesis: seeding the starter roster");
        for (name, kind) in STARTER_ROSTER {
            world.spawn(name, Some(kind), dice)?;
        }
        return Ok(Bootstrap::Genesis);
    }

    let names = store.entity_names()?;
    info!(
        tick = world.tick(),
        entity_count = names.len(),
        "resume: recovering persisted souls"
    );
    for name in &names {
        world.spawn(name, None, dice)?;
    }
    Ok(Bootstrap::Resume)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use godseed_core::actor::Actor;
    use godseed_core::dice::ScriptedDice;
    use godseed_types::LogKind;

    use super::*;

    #[test]
    fn fresh_world_gets_the_starter_roster() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path()).unwrap();
        let mut world = World::open(store.clone()).unwrap();

        let mut dice = ScriptedDice::default();
        let kind = populate(&mut world, &store, &mut dice).unwrap();

        assert_eq!(kind, Bootstrap::Genesis);
        assert_eq!(
            world.actor_names(),
            &[
                String::from("Eyla the Herbalist"),
                String::from("Korr the Smith"),
                String::from("The-One-Who-Watches"),
            ]
        );
        assert_eq!(
            world.actor("The-One-Who-Watches").map(Actor::trait_kind),
            Some(TraitKind::Dreamer)
        );
    }

    #[test]
    fn genesis_first_tick_snapshots_the_full_roster() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path()).unwrap();
        let mut world = World::open(store.clone()).unwrap();
        let mut dice = ScriptedDice::default();
        let _ = populate(&mut world, &store, &mut dice).unwrap();

        let summary = world.run_tick(&mut dice).unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.entity_count, 3);

        let world_log = store.world_log().unwrap();
        let ticks = world_log.recent(LogKind::Tick, 10);
        assert_eq!(ticks.len(), 1);
    }

    #[test]
    fn existing_world_resumes_instead_of_reseeding() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = LogStore::open(dir.path()).unwrap();
            let mut world = World::open(store.clone()).unwrap();
            let mut dice = ScriptedDice::default();
            let _ = populate(&mut world, &store, &mut dice).unwrap();
            // One extra soul beyond the starters.
            world
                .spawn("Fractal-5555", Some(TraitKind::GlitchKin), &mut dice)
                .unwrap();
            let _ = world.run_tick(&mut dice).unwrap();
        }

        let store = LogStore::open(dir.path()).unwrap();
        let mut world = World::open(store.clone()).unwrap();
        let mut dice = ScriptedDice::default();
        let kind = populate(&mut world, &store, &mut dice).unwrap();

        assert_eq!(kind, Bootstrap::Resume);
        assert_eq!(world.actor_names().len(), 4);
        assert_eq!(
            world.actor("Fractal-5555").map(Actor::trait_kind),
            Some(TraitKind::GlitchKin)
        );
    }
}
