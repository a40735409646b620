//! Shared world rules and the deltas gods apply to them.
//!
//! The rules mapping is owned by the world engine. Gods receive a read-only
//! view and return a [`RuleChanges`] delta; the engine merges each delta
//! into the live rules immediately after the god that produced it runs.
//! Actors read the rules (via their decision context) but never write them.
//!
//! Gravity is a [`Decimal`] rather than a float so that the canonical-value
//! check and the one-decimal rounding of chaos rolls are exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minutes per in-world day. Reserved for future use: no defined god
/// policy ever mutates it.
pub const DAY_CYCLE_MINUTES: u32 = 1440;

/// The canonical gravity the order god restores. Scale 1 (one decimal).
pub fn default_gravity() -> Decimal {
    Decimal::new(98, 1)
}

/// The shared, mutable world rules.
///
/// Read by every actor's decision procedure each tick; written only
/// through the engine's apply step after a god intervenes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRules {
    /// Gravitational constant, one decimal place. Default 9.8.
    pub gravity: Decimal,
    /// Whether magic is active. Actors may feel it tingle.
    pub magic_enabled: bool,
    /// Minutes per day. Constant; no god policy touches it.
    pub day_cycle: u32,
}

impl Default for WorldRules {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            magic_enabled: true,
            day_cycle: DAY_CYCLE_MINUTES,
        }
    }
}

impl WorldRules {
    /// Merge a delta into the live rules, overwriting by key.
    ///
    /// `day_cycle` has no corresponding delta field and therefore can
    /// never change here.
    pub fn apply(&mut self, changes: &RuleChanges) {
        if let Some(gravity) = changes.gravity {
            self.gravity = gravity;
        }
        if let Some(magic_enabled) = changes.magic_enabled {
            self.magic_enabled = magic_enabled;
        }
    }
}

/// A set of rule mutations produced by one god in one tick.
///
/// `None` means "leave unchanged". An empty delta is the common case;
/// [`RuleChanges::is_empty`] distinguishes it so the chaos announcement
/// is only prefixed when something actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleChanges {
    /// New gravity value, if the god rewrote it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<Decimal>,
    /// New magic flag, if the god flipped it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic_enabled: Option<bool>,
}

impl RuleChanges {
    /// True when the delta mutates nothing.
    pub const fn is_empty(&self) -> bool {
        self.gravity.is_none() && self.magic_enabled.is_none()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn defaults_match_genesis_rules() {
        let rules = WorldRules::default();
        assert_eq!(rules.gravity, dec!(9.8));
        assert!(rules.magic_enabled);
        assert_eq!(rules.day_cycle, 1440);
    }

    #[test]
    fn apply_overwrites_only_present_keys() {
        let mut rules = WorldRules::default();
        rules.apply(&RuleChanges {
            gravity: Some(dec!(0.3)),
            magic_enabled: None,
        });
        assert_eq!(rules.gravity, dec!(0.3));
        assert!(rules.magic_enabled);

        rules.apply(&RuleChanges {
            gravity: None,
            magic_enabled: Some(false),
        });
        assert_eq!(rules.gravity, dec!(0.3));
        assert!(!rules.magic_enabled);
    }

    #[test]
    fn empty_delta_is_empty() {
        assert!(RuleChanges::default().is_empty());
        assert!(
            !RuleChanges {
                gravity: Some(dec!(9.8)),
                magic_enabled: None,
            }
            .is_empty()
        );
    }

    #[test]
    fn day_cycle_survives_any_delta() {
        let mut rules = WorldRules::default();
        rules.apply(&RuleChanges {
            gravity: Some(dec!(20.0)),
            magic_enabled: Some(false),
        });
        assert_eq!(rules.day_cycle, DAY_CYCLE_MINUTES);
    }
}
