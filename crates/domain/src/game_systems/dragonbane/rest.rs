//! Rest tiers and recovery.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{Conditions, ResourcePool};

/// How long the characters rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestTier {
    /// Recover 1d6 WP.
    Round,
    /// Recover 1d6 HP, 2d6 with a healer present.
    Stretch,
    /// Full HP and WP; all conditions cleared.
    Shift,
}

impl fmt::Display for RestTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestTier::Round => write!(f, "round"),
            RestTier::Stretch => write!(f, "stretch"),
            RestTier::Shift => write!(f, "shift"),
        }
    }
}

impl FromStr for RestTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "round" => Ok(RestTier::Round),
            "stretch" => Ok(RestTier::Stretch),
            "shift" => Ok(RestTier::Shift),
            other => Err(DomainError::parse(format!("Unknown rest tier: {}", other))),
        }
    }
}

/// The parts of a character a rest touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestState {
    pub hp: ResourcePool,
    pub wp: ResourcePool,
    pub conditions: Conditions,
}

/// What a rest did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestResult {
    pub state: RestState,
    /// Recovery dice, empty for a shift.
    pub rolled: Vec<u8>,
    pub hp_recovered: i32,
    pub wp_recovered: i32,
}

/// Apply a rest to `state`.
///
/// `roll` is given a die size and must return a value in `1..=size`.
pub fn apply_rest<R>(
    state: RestState,
    tier: RestTier,
    healer_present: bool,
    roll: &mut R,
) -> RestResult
where
    R: FnMut(u8) -> u8,
{
    let mut next = state;
    let mut rolled = Vec::new();
    let mut hp_recovered = 0;
    let mut wp_recovered = 0;

    match tier {
        RestTier::Round => {
            let value = roll(6);
            rolled.push(value);
            wp_recovered = next.wp.credit(i32::from(value));
        }
        RestTier::Stretch => {
            let dice = if healer_present { 2 } else { 1 };
            for _ in 0..dice {
                rolled.push(roll(6));
            }
            let amount: i32 = rolled.iter().map(|&v| i32::from(v)).sum();
            hp_recovered = next.hp.credit(amount);
        }
        RestTier::Shift => {
            hp_recovered = next.hp.max() - next.hp.current();
            wp_recovered = next.wp.max() - next.wp.current();
            next.hp.refill();
            next.wp.refill();
            next.conditions = next.conditions.cleared();
        }
    }

    RestResult {
        state: next,
        rolled,
        hp_recovered,
        wp_recovered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{Condition, ResourceKind};

    fn state(hp: i32, wp: i32) -> RestState {
        RestState {
            hp: ResourcePool::with_current(ResourceKind::HitPoints, hp, 12),
            wp: ResourcePool::with_current(ResourceKind::Willpower, wp, 10),
            conditions: Conditions::none()
                .toggle(Condition::Dazed)
                .toggle(Condition::Angry),
        }
    }

    #[test]
    fn round_rest_recovers_willpower_only() {
        let result = apply_rest(state(4, 3), RestTier::Round, false, &mut |_| 5);
        assert_eq!(result.state.wp.current(), 8);
        assert_eq!(result.state.hp.current(), 4);
        assert_eq!(result.rolled, vec![5]);
        assert_eq!(result.wp_recovered, 5);
        assert!(result.state.conditions.any_active());
    }

    #[test]
    fn round_rest_caps_at_max() {
        let result = apply_rest(state(4, 8), RestTier::Round, false, &mut |_| 6);
        assert_eq!(result.state.wp.current(), 10);
        assert_eq!(result.wp_recovered, 2);
    }

    #[test]
    fn stretch_rest_rolls_two_dice_with_healer() {
        let mut values = vec![3u8, 4].into_iter();
        let mut roll = move |_: u8| values.next().unwrap_or(1);
        let result = apply_rest(state(2, 3), RestTier::Stretch, true, &mut roll);
        assert_eq!(result.rolled, vec![3, 4]);
        assert_eq!(result.state.hp.current(), 9);
        assert_eq!(result.state.wp.current(), 3);
    }

    #[test]
    fn stretch_rest_without_healer_rolls_one_die() {
        let result = apply_rest(state(2, 3), RestTier::Stretch, false, &mut |_| 6);
        assert_eq!(result.rolled, vec![6]);
        assert_eq!(result.hp_recovered, 6);
    }

    #[test]
    fn shift_rest_resets_everything() {
        for (hp, wp) in [(0, 0), (12, 10), (5, 9)] {
            let mut no_dice = |_: u8| -> u8 { panic!("shift rest does not roll") };
            let result = apply_rest(state(hp, wp), RestTier::Shift, false, &mut no_dice);
            assert!(result.state.hp.is_full());
            assert!(result.state.wp.is_full());
            assert_eq!(result.state.conditions, Conditions::none());
            assert!(result.rolled.is_empty());
        }
    }

    #[test]
    fn parses_tier_names() {
        assert_eq!("Shift".parse::<RestTier>().unwrap(), RestTier::Shift);
        assert!("nap".parse::<RestTier>().is_err());
    }
}
