//! Value objects - Immutable objects defined by their attributes

mod ability;
mod age;
mod attribute;
mod condition;
mod dice;
mod effect;
mod kin;
mod names;
mod profession;
mod resource;
mod skill;

pub use ability::{Ability, Spell, MAX_POWER_LEVEL, WP_PER_POWER_LEVEL};
pub use age::AgeCategory;
pub use attribute::{
    validate_raw_value, Attribute, Attributes, MAX_RAW_ATTRIBUTE, MIN_RAW_ATTRIBUTE,
};
pub use condition::{Condition, Conditions};
pub use dice::{
    CheckOutcome, DiceGroup, DiceParseError, DiceRoll, DiceSpec, DieResult, RollModifier, D20,
};
pub use effect::{Effect, GearEffect};
pub use kin::Kin;
pub use names::CharacterName;
pub use profession::{MagicSchool, Profession};
pub use resource::{ResourceKind, ResourcePool};
pub use skill::{find_skill, skill, skills_keyed_by, SkillDefinition, SkillKind, SKILLS};
