//! Dragonbane game system implementation.
//!
//! Dragonbane is a d20 roll-under system:
//! - Attributes (3-18) give a base chance of 3-7; trained skills double it
//! - A natural 1 (Dragon) always succeeds, a natural 20 (Demon) always fails
//! - Boon/bane roll the d20 twice and keep the better/worse result
//! - Any d20 roll, success or not, may be pushed once at the cost of a condition
//! - Characters advance by marking skills; milestones grant rewards

mod advancement;
mod attributes;
mod dice;
mod rest;
mod skills;

pub use advancement::{
    advancement_options, level_of, AdvancementKind, AdvancementTracker, ClaimedAdvancement,
};
pub use attributes::{
    base_chance, damage_bonus, derive_attributes, final_attributes, final_value, movement,
    roll_attribute, roll_attributes, AttributeRoll, DamageBonus, DerivedStats,
};
pub(crate) use attributes::derive_unchecked;
pub use dice::{resolve_check, roll_group, DiceEngine, DEFAULT_HISTORY_CAPACITY};
pub use rest::{apply_rest, RestResult, RestState, RestTier};
pub use skills::{effective_skill_value, roll_context, ModifierSource, RollContext};
