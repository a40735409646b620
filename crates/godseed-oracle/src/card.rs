//! Consultation card and response schemas.
//!
//! A consultation card packages a snapshot of the world (tick, actors,
//! their recent actions) together with per-god instructions, for a human
//! to carry to an external oracle. The oracle answers with a
//! [`GodResponse`]: the same rule-delta shape the in-process gods
//! produce, applied manually by the operator.

use chrono::{DateTime, Utc};
use godseed_store::LogStore;
use godseed_types::{GodName, LogKind, LogPayload, RuleChanges};
use serde::{Deserialize, Serialize};

use crate::error::CardError;

/// How many recent actions each actor summary carries.
const RECENT_ACTION_LIMIT: usize = 3;

/// The default query stamped on a card when none is given.
pub const DEFAULT_QUERY: &str = "What should happen next in the world?";

/// A full consultation card, serialized into the exported PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationCard {
    /// The god being consulted.
    pub god: GodName,
    /// The operator's question.
    pub query: String,
    /// When the card was created.
    pub timestamp: DateTime<Utc>,
    /// The world snapshot at card creation.
    pub world: WorldSummary,
    /// Instructions telling the oracle how to answer.
    pub instructions: String,
}

/// Snapshot of the world at card creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSummary {
    /// The last fully completed tick.
    pub tick: u64,
    /// Every known actor, in name order.
    pub actors: Vec<ActorSummary>,
    /// Number of actors in the snapshot.
    pub actor_count: usize,
}

/// One actor's state as presented to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSummary {
    /// The actor's name.
    pub name: String,
    /// Its persisted trait identifier. Passed through raw, so a card can
    /// still be exported from a world with unrecognized history.
    pub archetype: String,
    /// Whether it has awakened.
    pub awakened: bool,
    /// Its most recent action lines, newest first.
    pub recent_actions: Vec<String>,
}

/// The answer schema an oracle writes back.
///
/// Every field beyond `god` is optional, so a minimal hand-written
/// response still parses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GodResponse {
    /// Which god answered.
    #[serde(default)]
    pub god: String,
    /// Rule mutations to apply.
    #[serde(default)]
    pub changes: RuleChanges,
    /// Proclamations to display.
    #[serde(default)]
    pub messages: Vec<String>,
    /// New actors to create.
    #[serde(default)]
    pub spawns: Vec<String>,
    /// The god's reflection on the world state.
    #[serde(default)]
    pub lore: Option<String>,
}

/// Assemble a consultation card from the persisted world state.
///
/// Reads the world tick from the world log and summarizes every entity
/// discovered in the data directory, without loading the engine.
///
/// # Errors
///
/// Returns [`CardError::Store`] if the store cannot be read.
pub fn build_card(store: &LogStore, god: GodName, query: &str) -> Result<ConsultationCard, CardError> {
    let world_log = store.world_log()?;
    let tick = world_log.latest_or(
        |p| match p {
            LogPayload::Tick { tick, .. } => Some(*tick),
            _ => None,
        },
        0,
    );

    let mut actors = Vec::new();
    for name in store.entity_names()? {
        let log = store.entity_log(&name)?;
        let archetype = log
            .latest(|p| match p {
                LogPayload::Identity { archetype } => Some(archetype.clone()),
                _ => None,
            })
            .unwrap_or_else(|| String::from("unknown"));
        let awakened = log.latest_or(
            |p| match p {
                LogPayload::Awakening { awakened } => Some(*awakened),
                _ => None,
            },
            false,
        );
        let recent_actions = log
            .recent(LogKind::Action, RECENT_ACTION_LIMIT)
            .iter()
            .filter_map(|r| match &r.payload {
                LogPayload::Action { action, .. } => Some(action.clone()),
                _ => None,
            })
            .collect();
        actors.push(ActorSummary {
            name,
            archetype,
            awakened,
            recent_actions,
        });
    }

    let actor_count = actors.len();
    Ok(ConsultationCard {
        god,
        query: query.to_owned(),
        timestamp: Utc::now(),
        instructions: instructions(god, query, tick, actor_count),
        world: WorldSummary {
            tick,
            actors,
            actor_count,
        },
    })
}

/// The per-card instruction text presented to the oracle.
fn instructions(god: GodName, query: &str, tick: u64, actor_count: usize) -> String {
    format!(
        "You are {god}, one of three gods of the Godseed world.\n\
         \n\
         YOUR ROLE:\n\
         - Axiom: maintain order, restore constants\n\
         - Fray: create chaos, rewrite gravity, spawn anomalies\n\
         - Echo: reflect lore, weave recursive narratives\n\
         \n\
         CURRENT STATE:\n\
         - Tick: {tick}\n\
         - Active souls: {actor_count}\n\
         \n\
         QUERY: {query}\n\
         \n\
         RESPOND WITH JSON:\n\
         {{\n\
         \x20 \"god\": \"{god}\",\n\
         \x20 \"changes\": {{\"gravity\": 9.8, \"magic_enabled\": true}},\n\
         \x20 \"messages\": [\"Your divine proclamation\"],\n\
         \x20 \"spawns\": [\"New Soul Name\"],\n\
         \x20 \"lore\": \"Your reflection on the world state\"\n\
         }}\n\
         \n\
         Either paste the JSON back, or embed it in a response PNG under\n\
         the GODSEED_RESPONSE text chunk."
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use godseed_types::TraitKind;
    use godseed_types::WorldRules;

    use super::*;

    fn seeded_store() -> (tempfile::TempDir, LogStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path()).unwrap();

        let mut world = store.world_log().unwrap();
        world
            .append(LogPayload::Tick {
                tick: 12,
                rules: WorldRules::default(),
                entity_count: 1,
            })
            .unwrap();

        let mut eyla = store.entity_log("Eyla the Herbalist").unwrap();
        eyla.append(LogPayload::Identity {
            archetype: TraitKind::Keeper.id().to_owned(),
        })
        .unwrap();
        eyla.append(LogPayload::Awakening { awakened: true }).unwrap();
        for tick in 1..=5 {
            eyla.append(LogPayload::Action {
                tick,
                action: format!("action {tick}"),
            })
            .unwrap();
        }

        (dir, store)
    }

    #[test]
    fn card_summarizes_world_and_actors() {
        let (_dir, store) = seeded_store();
        let card = build_card(&store, GodName::Fray, DEFAULT_QUERY).unwrap();

        assert_eq!(card.god, GodName::Fray);
        assert_eq!(card.world.tick, 12);
        assert_eq!(card.world.actor_count, 1);

        let actor = card.world.actors.first().unwrap();
        assert_eq!(actor.name, "Eyla the Herbalist");
        assert_eq!(actor.archetype, "keeper");
        assert!(actor.awakened);
        // Newest first, capped at three.
        assert_eq!(actor.recent_actions, vec!["action 5", "action 4", "action 3"]);
    }

    #[test]
    fn card_instructions_name_the_god_and_query() {
        let (_dir, store) = seeded_store();
        let card = build_card(&store, GodName::Echo, "Is anyone dreaming?").unwrap();
        assert!(card.instructions.contains("You are Echo"));
        assert!(card.instructions.contains("QUERY: Is anyone dreaming?"));
        assert!(card.instructions.contains("GODSEED_RESPONSE"));
    }

    #[test]
    fn empty_world_yields_an_empty_card() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path()).unwrap();
        let card = build_card(&store, GodName::Axiom, DEFAULT_QUERY).unwrap();
        assert_eq!(card.world.tick, 0);
        assert!(card.world.actors.is_empty());
    }

    #[test]
    fn minimal_response_parses_with_defaults() {
        let response: GodResponse = serde_json::from_str(r#"{"god":"Fray"}"#).unwrap();
        assert_eq!(response.god, "Fray");
        assert!(response.changes.is_empty());
        assert!(response.messages.is_empty());
        assert!(response.spawns.is_empty());
        assert!(response.lore.is_none());
    }

    #[test]
    fn full_response_round_trips() {
        let json = r#"{
            "god": "Fray",
            "changes": {"gravity": "0.5", "magic_enabled": false},
            "messages": ["THE FLOOR IS A SUGGESTION"],
            "spawns": ["Fractal-1234"],
            "lore": "Down was always a habit, not a law"
        }"#;
        let response: GodResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.changes.gravity,
            Some(rust_decimal::Decimal::new(5, 1))
        );
        assert_eq!(response.changes.magic_enabled, Some(false));
        assert_eq!(response.spawns, vec!["Fractal-1234"]);
    }
}
