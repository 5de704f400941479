//! Character-related domain events
//!
//! These enums communicate what happened when character state was modified,
//! allowing callers to react appropriately.

use serde::{Deserialize, Serialize};

use crate::game_systems::dragonbane::{AdvancementKind, RestTier};
use crate::value_objects::{Attribute, Condition, ResourceKind};

/// Outcome of applying damage to a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DamageOutcome {
    /// HP was already at zero, no effect
    AlreadyDown,
    /// Character took damage but is still standing
    Wounded { damage_dealt: i32, remaining_hp: i32 },
    /// This damage brought HP to zero
    Downed { damage_dealt: i32 },
}

/// Outcome of healing a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HealOutcome {
    /// Healing applied
    Healed { amount_healed: i32, new_hp: i32 },
    /// Already at max HP
    AlreadyFull,
}

/// A condition was switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionToggled {
    pub condition: Condition,
    pub active: bool,
}

/// Outcome of marking a skill after a Dragon or Demon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SkillMarkOutcome {
    /// The skill is newly marked; `level` is the new character level.
    Marked { skill: String, level: u32 },
    /// Marks never stack; nothing changed.
    AlreadyMarked { skill: String },
}

/// A milestone reward that was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvancementOutcome {
    AttributeIncreased {
        attribute: Attribute,
        from: i32,
        to: i32,
        /// Set when CON or WIL changed a pool maximum.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pool: Option<PoolResized>,
    },
    SkillTrained {
        skill: String,
    },
    SpellLearned {
        spell: String,
    },
    HeroicAbilityGained {
        ability: String,
    },
}

impl AdvancementOutcome {
    pub fn kind(&self) -> AdvancementKind {
        match self {
            AdvancementOutcome::AttributeIncreased { .. } => AdvancementKind::Attribute,
            AdvancementOutcome::SkillTrained { .. } => AdvancementKind::Skill,
            AdvancementOutcome::SpellLearned { .. } => AdvancementKind::Spell,
            AdvancementOutcome::HeroicAbilityGained { .. } => AdvancementKind::HeroicAbility,
        }
    }
}

/// An ability or spell was activated and paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUsed {
    pub name: String,
    pub wp_spent: i32,
    pub remaining_wp: i32,
}

/// What a rest recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestOutcome {
    pub tier: RestTier,
    pub rolled: Vec<u8>,
    pub hp_recovered: i32,
    pub wp_recovered: i32,
    pub conditions_cleared: bool,
}

/// A pool maximum changed because its attribute changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolResized {
    pub kind: ResourceKind,
    pub max: i32,
    pub current: i32,
}
