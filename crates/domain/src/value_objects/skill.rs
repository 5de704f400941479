//! The fixed skill catalogue
//!
//! Every skill keys off exactly one attribute. Skill identity is its name;
//! lookups are case-insensitive and always return the canonical spelling.

use serde::Serialize;

use super::Attribute;
use crate::error::DomainError;

/// Skill grouping, as laid out on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    General,
    Weapon,
    Magic,
}

/// A skill and the attribute it keys off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SkillDefinition {
    pub name: &'static str,
    pub attribute: Attribute,
    pub kind: SkillKind,
}

const fn general(name: &'static str, attribute: Attribute) -> SkillDefinition {
    SkillDefinition {
        name,
        attribute,
        kind: SkillKind::General,
    }
}

const fn weapon(name: &'static str, attribute: Attribute) -> SkillDefinition {
    SkillDefinition {
        name,
        attribute,
        kind: SkillKind::Weapon,
    }
}

const fn magic(name: &'static str) -> SkillDefinition {
    SkillDefinition {
        name,
        attribute: Attribute::Wil,
        kind: SkillKind::Magic,
    }
}

/// All skills in sheet order.
pub const SKILLS: &[SkillDefinition] = &[
    general("Acrobatics", Attribute::Agl),
    general("Awareness", Attribute::Int),
    general("Bartering", Attribute::Cha),
    general("Beast Lore", Attribute::Int),
    general("Bluffing", Attribute::Cha),
    general("Bushcraft", Attribute::Int),
    general("Crafting", Attribute::Str),
    general("Evade", Attribute::Agl),
    general("Healing", Attribute::Int),
    general("Hunting & Fishing", Attribute::Agl),
    general("Languages", Attribute::Int),
    general("Myths & Legends", Attribute::Int),
    general("Performance", Attribute::Cha),
    general("Persuasion", Attribute::Cha),
    general("Riding", Attribute::Agl),
    general("Seamanship", Attribute::Int),
    general("Sleight of Hand", Attribute::Agl),
    general("Sneaking", Attribute::Agl),
    general("Spot Hidden", Attribute::Int),
    general("Swimming", Attribute::Agl),
    weapon("Axes", Attribute::Str),
    weapon("Bows", Attribute::Agl),
    weapon("Brawling", Attribute::Str),
    weapon("Crossbows", Attribute::Agl),
    weapon("Hammers", Attribute::Str),
    weapon("Knives", Attribute::Agl),
    weapon("Slings", Attribute::Agl),
    weapon("Spears", Attribute::Str),
    weapon("Staves", Attribute::Agl),
    weapon("Swords", Attribute::Str),
    magic("Animism"),
    magic("Elementalism"),
    magic("Mentalism"),
];

/// Look up a skill by name, ignoring case and surrounding whitespace.
pub fn find_skill(name: &str) -> Option<&'static SkillDefinition> {
    let name = name.trim();
    SKILLS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Like [`find_skill`], but unknown names are an error.
pub fn skill(name: &str) -> Result<&'static SkillDefinition, DomainError> {
    find_skill(name).ok_or_else(|| DomainError::not_found("skill", name.trim()))
}

/// Skills keyed off `attribute`, in sheet order.
pub fn skills_keyed_by(attribute: Attribute) -> impl Iterator<Item = &'static SkillDefinition> {
    SKILLS.iter().filter(move |s| s.attribute == attribute)
}
