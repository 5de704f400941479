//! Structured roll effects from gear and abilities
//!
//! Effects are decided when the data is loaded, not parsed from prose at roll
//! time. Free-text effects that the engine cannot classify are kept as
//! `Narrative` and have no mechanical weight.

use serde::{Deserialize, Serialize};

use super::{Attribute, RollModifier, SkillDefinition};

/// A mechanical effect on rolls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    BaneOnSkill { skill: String },
    BoonOnSkill { skill: String },
    BaneOnAttribute { attribute: Attribute },
    BoonOnAttribute { attribute: Attribute },
    Narrative { text: String },
}

impl Effect {
    /// The modifier this effect imposes on a roll of `skill`, if any.
    pub fn modifier_for(&self, skill: &SkillDefinition) -> Option<RollModifier> {
        match self {
            Effect::BaneOnSkill { skill: name } if name.eq_ignore_ascii_case(skill.name) => {
                Some(RollModifier::Bane)
            }
            Effect::BoonOnSkill { skill: name } if name.eq_ignore_ascii_case(skill.name) => {
                Some(RollModifier::Boon)
            }
            Effect::BaneOnAttribute { attribute } if *attribute == skill.attribute => {
                Some(RollModifier::Bane)
            }
            Effect::BoonOnAttribute { attribute } if *attribute == skill.attribute => {
                Some(RollModifier::Boon)
            }
            _ => None,
        }
    }

    pub fn is_narrative(&self) -> bool {
        matches!(self, Effect::Narrative { .. })
    }
}

/// An effect attached to a named piece of gear.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GearEffect {
    pub source: String,
    pub effect: Effect,
}

impl GearEffect {
    pub fn new(source: impl Into<String>, effect: Effect) -> Self {
        Self {
            source: source.into(),
            effect,
        }
    }
}
