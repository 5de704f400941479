//! Skill values and the roll context for a check.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Condition, Conditions, GearEffect, RollModifier, SkillDefinition};

/// Trained skills count double.
pub fn effective_skill_value(base_chance: u8, trained: bool) -> u8 {
    if trained {
        base_chance.saturating_mul(2)
    } else {
        base_chance
    }
}

/// Why a modifier applies to a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModifierSource {
    Condition { condition: Condition },
    Gear { source: String },
}

/// What the rules impose on a check before the player chooses anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollContext {
    /// A bane that cannot be removed or overridden.
    pub forced_bane: bool,
    /// A boon is offered by gear; the caller may take it.
    pub suggested_boon: bool,
    pub sources: Vec<ModifierSource>,
}

impl RollContext {
    /// The modifier actually used, given what the caller asked for.
    ///
    /// A forced bane wins over any request.
    pub fn resolve(&self, requested: RollModifier) -> RollModifier {
        if self.forced_bane {
            RollModifier::Bane
        } else {
            requested
        }
    }

    /// The modifier to use when the caller expresses no preference.
    pub fn default_modifier(&self) -> RollModifier {
        if self.forced_bane {
            RollModifier::Bane
        } else if self.suggested_boon {
            RollModifier::Boon
        } else {
            RollModifier::None
        }
    }
}

/// Build the context for a check of `skill`.
///
/// The condition bound to the skill's attribute forces a bane, as does any
/// gear effect with a bane on the skill or its attribute.
pub fn roll_context(
    skill: &SkillDefinition,
    conditions: &Conditions,
    effects: &[GearEffect],
) -> RollContext {
    let mut context = RollContext::default();

    if conditions.banes_attribute(skill.attribute) {
        context.forced_bane = true;
        context.sources.push(ModifierSource::Condition {
            condition: Condition::for_attribute(skill.attribute),
        });
    }

    for gear in effects {
        match gear.effect.modifier_for(skill) {
            Some(RollModifier::Bane) => {
                context.forced_bane = true;
                context.sources.push(ModifierSource::Gear {
                    source: gear.source.clone(),
                });
            }
            Some(RollModifier::Boon) => {
                context.suggested_boon = true;
                context.sources.push(ModifierSource::Gear {
                    source: gear.source.clone(),
                });
            }
            _ => {}
        }
    }

    context
}
