//! Kin and heroic abilities, and spells
//!
//! An ability's willpower cost is consumed on use; its effect is free text
//! that the engine does not interpret.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Highest power level a spell can be cast at.
pub const MAX_POWER_LEVEL: u8 = 3;
/// Willpower spent per power level of a spell.
pub const WP_PER_POWER_LEVEL: i32 = 2;

/// A named ability with an optional willpower cost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wp_cost: Option<u8>,
    pub effect: String,
}

impl Ability {
    pub fn new(name: impl Into<String>, wp_cost: Option<u8>, effect: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wp_cost,
            effect: effect.into(),
        }
    }

    /// Willpower consumed when the ability is activated.
    pub fn cost(&self) -> i32 {
        self.wp_cost.map(i32::from).unwrap_or(0)
    }
}

/// A spell known by a mage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    /// Spell rank; rank 0 spells are tricks.
    #[serde(default)]
    pub rank: u8,
}

impl Spell {
    pub fn new(name: impl Into<String>, rank: u8) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }

    pub fn is_trick(&self) -> bool {
        self.rank == 0
    }

    /// Willpower needed to cast at `power_level`.
    ///
    /// Tricks cost a single point regardless of power level. Ranked spells
    /// cost two points per power level, and the power level must be 1-3.
    pub fn casting_cost(&self, power_level: u8) -> Result<i32, DomainError> {
        if self.is_trick() {
            return Ok(1);
        }
        if power_level == 0 || power_level > MAX_POWER_LEVEL {
            return Err(DomainError::validation(format!(
                "Power level must be between 1 and {}, got {}",
                MAX_POWER_LEVEL, power_level
            )));
        }
        Ok(WP_PER_POWER_LEVEL * i32::from(power_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_cost_defaults_to_zero() {
        assert_eq!(Ability::new("Inner Peace", None, "").cost(), 0);
        assert_eq!(Ability::new("Adaptive", Some(3), "").cost(), 3);
    }

    #[test]
    fn spell_cost_scales_with_power() {
        let fireball = Spell::new("Fireball", 1);
        assert_eq!(fireball.casting_cost(1).unwrap(), 2);
        assert_eq!(fireball.casting_cost(3).unwrap(), 6);
        assert!(fireball.casting_cost(0).is_err());
        assert!(fireball.casting_cost(4).is_err());
    }

    #[test]
    fn tricks_cost_one() {
        assert_eq!(Spell::new("Light", 0).casting_cost(0).unwrap(), 1);
    }
}
