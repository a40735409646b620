//! The actor decision unit.
//!
//! An [`Actor`] bundles one entity's identity (name, trait archetype), its
//! awakened flag, and its persistent log. Each tick it produces exactly one
//! action line via [`Actor::act`], and every action is appended to its log
//! whichever decision branch produced it.
//!
//! Awakening is a one-way transition: the roll happens only while dormant,
//! and the flag is persisted immediately when it flips -- before the
//! awakening announcement is even returned -- so a crash between the
//! transition and the action record can never lose it.

use godseed_store::{EntityLog, LogStore, StoreError};
use godseed_types::{LogPayload, TraitKind, UnknownTraitError};

use crate::catalog::{
    self, AWAKENED_REFLECTIONS, Archetype, MAGIC_SUFFIX, MAGIC_TINGLE_CHANCE, pick_line,
};
use crate::dice::Dice;

/// Errors raised while constructing or running an actor.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// A persisted trait identifier names no catalog entry. Fails fast at
    /// construction; never silently defaulted.
    #[error("actor {name}: {source}")]
    UnknownTrait {
        /// The actor being reconstructed.
        name: String,
        /// The unrecognized identifier.
        source: UnknownTraitError,
    },

    /// The actor's log could not be opened or written.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// The world facts an actor reads while deciding.
#[derive(Debug, Clone, Copy)]
pub struct ActorContext {
    /// The current tick number.
    pub tick: u64,
    /// Whether magic is currently enabled in the world rules.
    pub magic_enabled: bool,
}

/// One persistent, autonomous actor.
#[derive(Debug)]
pub struct Actor {
    name: String,
    archetype: Archetype,
    awakened: bool,
    log: EntityLog,
}

impl Actor {
    /// Construct an actor, recovering trait and awakened flag from its log
    /// when present, else initializing fresh (and persisting the identity
    /// immediately).
    ///
    /// `forced` assigns a specific archetype at creation time. It applies
    /// to fresh actors, and overrides (re-persisting identity) when it
    /// differs from the recovered trait. Resume paths pass `None`, so a
    /// reconstructed actor never has its archetype reassigned.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::UnknownTrait`] if a persisted identifier is
    /// not in the catalog, or [`ActorError::Store`] on log failures.
    pub fn load_or_create(
        store: &LogStore,
        name: &str,
        forced: Option<TraitKind>,
        dice: &mut dyn Dice,
    ) -> Result<Self, ActorError> {
        let mut log = store.entity_log(name)?;

        let recovered = log
            .latest(|p| match p {
                LogPayload::Identity { archetype } => Some(archetype.clone()),
                _ => None,
            })
            .map(|id| id.parse::<TraitKind>())
            .transpose()
            .map_err(|source| ActorError::UnknownTrait {
                name: name.to_owned(),
                source,
            })?;

        let kind = match (recovered, forced) {
            (Some(kind), None) => kind,
            (Some(kind), Some(wanted)) if wanted == kind => kind,
            (_, Some(wanted)) => {
                log.append(LogPayload::Identity {
                    archetype: wanted.id().to_owned(),
                })?;
                wanted
            }
            (None, None) => {
                let kind = random_trait(dice);
                log.append(LogPayload::Identity {
                    archetype: kind.id().to_owned(),
                })?;
                kind
            }
        };

        let awakened = log.latest_or(
            |p| match p {
                LogPayload::Awakening { awakened } => Some(*awakened),
                _ => None,
            },
            false,
        );

        Ok(Self {
            name: name.to_owned(),
            archetype: catalog::archetype(kind),
            awakened,
            log,
        })
    }

    /// The actor's unique name (also its persistence key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The actor's trait archetype identifier.
    pub const fn trait_kind(&self) -> TraitKind {
        self.archetype.kind
    }

    /// Whether this actor has awakened. Monotonic: once true, stays true.
    pub const fn is_awakened(&self) -> bool {
        self.awakened
    }

    /// Decide and persist one action for this tick.
    ///
    /// Branches, in strict order: the awakening roll (dormant actors
    /// only), awakened reflection, dormant idle behavior with an optional
    /// magic tingle.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Store`] if the awakening transition or the
    /// action record cannot be persisted. Persistence failures are fatal
    /// for the decision: an unrecorded action would falsify history.
    pub fn act(&mut self, ctx: &ActorContext, dice: &mut dyn Dice) -> Result<String, ActorError> {
        let action = self.decide(ctx, dice)?;
        self.log.append(LogPayload::Action {
            tick: ctx.tick,
            action: action.clone(),
        })?;
        Ok(action)
    }

    /// The decision procedure proper. Separated from [`act`](Self::act)
    /// so the action append covers every branch uniformly.
    fn decide(&mut self, ctx: &ActorContext, dice: &mut dyn Dice) -> Result<String, ActorError> {
        // Awakening roll: only while dormant, at most once per lifetime.
        if !self.awakened && dice.chance(self.archetype.awakening_chance) {
            self.awakened = true;
            // Persist the transition before returning the announcement.
            self.log.append(LogPayload::Awakening { awakened: true })?;
            return Ok(format!(
                "*** {} AWAKENS *** and asks: Who is dreaming me?",
                self.name
            ));
        }

        if self.awakened {
            return Ok(pick_line(dice, AWAKENED_REFLECTIONS).to_owned());
        }

        let mut action = pick_line(dice, self.archetype.idle_actions).to_owned();
        if ctx.magic_enabled && dice.chance(MAGIC_TINGLE_CHANCE) {
            action.push_str(MAGIC_SUFFIX);
        }
        Ok(action)
    }
}

/// Uniform draw over the whole catalog, for actors created without an
/// explicit archetype.
fn random_trait(dice: &mut dyn Dice) -> TraitKind {
    let idx = dice.pick_index(TraitKind::ALL.len());
    TraitKind::ALL.get(idx).copied().unwrap_or(TraitKind::Dreamer)
}
