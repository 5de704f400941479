//! Sheetsmith domain: the character rules-and-resolution engine.
//!
//! Pure and synchronous. Nothing here performs I/O or draws randomness on its
//! own; dice are rolled through a caller-supplied closure.

pub mod aggregates;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    AdvancementChoice, CharacterBuilder, CharacterDraft, CreationField, PlayerCharacter,
    SkillCheck,
};
pub use error::DomainError;
pub use events::{
    AdvancementOutcome, ConditionToggled, DamageOutcome, HealOutcome, PoolResized, PowerUsed,
    RestOutcome, SkillMarkOutcome,
};
pub use game_systems::dragonbane::{
    advancement_options, apply_rest, base_chance, damage_bonus, derive_attributes,
    effective_skill_value, level_of, movement, resolve_check, roll_attribute, roll_attributes,
    roll_context, roll_group, AdvancementKind, AdvancementTracker, AttributeRoll,
    ClaimedAdvancement, DamageBonus, DerivedStats, DiceEngine, ModifierSource, RestResult,
    RestState, RestTier, RollContext, DEFAULT_HISTORY_CAPACITY,
};
pub use ids::{CharacterId, DraftId};
pub use value_objects::{
    Ability, AgeCategory, Attribute, Attributes, CharacterName, CheckOutcome, Condition,
    Conditions, DiceGroup, DiceParseError, DiceRoll, DiceSpec, DieResult, Effect, GearEffect,
    Kin, MagicSchool, Profession, ResourceKind, ResourcePool, RollModifier, SkillDefinition,
    SkillKind, Spell,
};
