//! Attribute derivation: base chance, age modifiers, movement and damage bonus.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::{AgeCategory, Attribute, Attributes, Kin};

/// Base chance for a final attribute value.
///
/// | final | base chance |
/// |-------|-------------|
/// | ≤5    | 3           |
/// | 6–8   | 4           |
/// | 9–12  | 5           |
/// | 13–15 | 6           |
/// | ≥16   | 7           |
pub fn base_chance(final_value: i32) -> u8 {
    match final_value {
        i32::MIN..=5 => 3,
        6..=8 => 4,
        9..=12 => 5,
        13..=15 => 6,
        _ => 7,
    }
}

/// Raw value plus the age modifier. Never clamped.
pub fn final_value(raw: i32, age: AgeCategory, attribute: Attribute) -> i32 {
    raw + age.attribute_modifier(attribute)
}

/// Final scores for a full set of raw attributes.
pub fn final_attributes(raw: &Attributes, age: AgeCategory) -> Attributes {
    let mut finals = *raw;
    for (attribute, value) in raw.iter() {
        finals.set(attribute, final_value(value, age, attribute));
    }
    finals
}

fn agility_movement_step(final_agl: i32) -> i32 {
    match final_agl {
        i32::MIN..=6 => -4,
        7..=9 => -2,
        10..=12 => 0,
        13..=15 => 2,
        _ => 4,
    }
}

/// Kin base movement adjusted by final AGL.
pub fn movement(kin: Kin, final_agl: i32) -> i32 {
    kin.base_movement() + agility_movement_step(final_agl)
}

/// Extra damage die from a high STR (melee) or AGL (ranged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageBonus {
    #[default]
    None,
    D4,
    D6,
}

impl DamageBonus {
    /// Die size of the bonus, if any.
    pub fn die_size(self) -> Option<u8> {
        match self {
            DamageBonus::None => None,
            DamageBonus::D4 => Some(4),
            DamageBonus::D6 => Some(6),
        }
    }
}

impl fmt::Display for DamageBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageBonus::None => write!(f, "-"),
            DamageBonus::D4 => write!(f, "+D4"),
            DamageBonus::D6 => write!(f, "+D6"),
        }
    }
}

pub fn damage_bonus(final_value: i32) -> DamageBonus {
    match final_value {
        i32::MIN..=12 => DamageBonus::None,
        13..=15 => DamageBonus::D4,
        _ => DamageBonus::D6,
    }
}

/// Everything derived from raw attributes, age and kin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Final (age-adjusted) scores.
    pub finals: Attributes,
    /// Base chance per attribute, computed from the final score.
    pub base_chances: Attributes,
    pub movement: i32,
    pub damage_bonus_str: DamageBonus,
    pub damage_bonus_agl: DamageBonus,
    /// Final CON.
    pub max_hp: i32,
    /// Final WIL.
    pub max_wp: i32,
}

impl DerivedStats {
    pub fn base_chance(&self, attribute: Attribute) -> u8 {
        // Always in 3..=7
        self.base_chances.get(attribute) as u8
    }

    pub fn final_value(&self, attribute: Attribute) -> i32 {
        self.finals.get(attribute)
    }
}

/// Derive all statistics from raw attributes.
///
/// # Errors
///
/// Returns `DomainError::Validation` if any raw score is outside [3, 18].
pub fn derive_attributes(
    raw: &Attributes,
    age: AgeCategory,
    kin: Kin,
) -> Result<DerivedStats, DomainError> {
    raw.validate_raw()?;
    Ok(derive_unchecked(raw, age, kin))
}

/// Derivation without range validation, for stored characters whose raw
/// scores were validated at creation.
pub(crate) fn derive_unchecked(raw: &Attributes, age: AgeCategory, kin: Kin) -> DerivedStats {
    let finals = final_attributes(raw, age);
    let mut base_chances = Attributes::uniform(0);
    for (attribute, value) in finals.iter() {
        base_chances.set(attribute, i32::from(base_chance(value)));
    }

    DerivedStats {
        finals,
        base_chances,
        movement: movement(kin, finals.agility),
        damage_bonus_str: damage_bonus(finals.strength),
        damage_bonus_agl: damage_bonus(finals.agility),
        max_hp: finals.constitution,
        max_wp: finals.willpower,
    }
}

// ============================================================================
// Attribute rolling
// ============================================================================

/// One 4d6-drop-lowest roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRoll {
    pub dice: [u8; 4],
    pub dropped: u8,
    pub total: i32,
}

/// Roll four d6, discard the single lowest and sum the rest.
///
/// `roll` is given a die size and must return a value in `1..=size`.
pub fn roll_attribute<R>(roll: &mut R) -> AttributeRoll
where
    R: FnMut(u8) -> u8,
{
    let dice = [roll(6), roll(6), roll(6), roll(6)];
    let dropped = dice.iter().copied().min().unwrap_or(1);
    let sum: i32 = dice.iter().map(|&d| i32::from(d)).sum();
    AttributeRoll {
        dice,
        dropped,
        total: sum - i32::from(dropped),
    }
}

/// Roll every attribute in sheet order.
pub fn roll_attributes<R>(roll: &mut R) -> (Attributes, Vec<AttributeRoll>)
where
    R: FnMut(u8) -> u8,
{
    let mut attributes = Attributes::uniform(0);
    let mut rolls = Vec::with_capacity(Attribute::ALL.len());
    for attribute in Attribute::ALL {
        let rolled = roll_attribute(roll);
        attributes.set(attribute, rolled.total);
        rolls.push(rolled);
    }
    (attributes, rolls)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(values: Vec<u8>) -> impl FnMut(u8) -> u8 {
        let mut iter = values.into_iter();
        move |_| iter.next().unwrap_or(1)
    }

    mod base_chance_table {
        use super::*;

        #[test]
        fn matches_table_at_every_boundary() {
            assert_eq!(base_chance(5), 3);
            assert_eq!(base_chance(6), 4);
            assert_eq!(base_chance(8), 4);
            assert_eq!(base_chance(9), 5);
            assert_eq!(base_chance(12), 5);
            assert_eq!(base_chance(13), 6);
            assert_eq!(base_chance(15), 6);
            assert_eq!(base_chance(16), 7);
        }

        #[test]
        fn handles_values_outside_raw_range() {
            assert_eq!(base_chance(-3), 3);
            assert_eq!(base_chance(1), 3);
            assert_eq!(base_chance(25), 7);
        }

        #[test]
        fn is_non_decreasing() {
            for v in -5..30 {
                assert!(base_chance(v) <= base_chance(v + 1), "drop at {}", v);
            }
        }
    }

    mod movement_and_damage {
        use super::*;

        #[test]
        fn movement_adds_agility_step() {
            assert_eq!(movement(Kin::Human, 6), 6);
            assert_eq!(movement(Kin::Human, 7), 8);
            assert_eq!(movement(Kin::Elf, 12), 10);
            assert_eq!(movement(Kin::Dwarf, 13), 10);
            assert_eq!(movement(Kin::Wolfkin, 16), 16);
            assert_eq!(movement(Kin::Mallard, 9), 6);
        }

        #[test]
        fn movement_is_pure() {
            assert_eq!(movement(Kin::Halfling, 14), movement(Kin::Halfling, 14));
        }

        #[test]
        fn damage_bonus_thresholds() {
            assert_eq!(damage_bonus(12), DamageBonus::None);
            assert_eq!(damage_bonus(13), DamageBonus::D4);
            assert_eq!(damage_bonus(15), DamageBonus::D4);
            assert_eq!(damage_bonus(16), DamageBonus::D6);
            assert_eq!(DamageBonus::D6.to_string(), "+D6");
            assert_eq!(DamageBonus::D4.die_size(), Some(4));
        }
    }

    mod derivation {
        use super::*;

        #[test]
        fn old_strength_scenario() {
            let raw = Attributes::uniform(10).with(Attribute::Str, 14);
            let derived = derive_attributes(&raw, AgeCategory::Old, Kin::Human).unwrap();
            assert_eq!(derived.final_value(Attribute::Str), 12);
            assert_eq!(derived.base_chance(Attribute::Str), 5);
        }

        #[test]
        fn strength_and_agility_bonuses_are_independent() {
            let raw = Attributes::new(16, 10, 13, 10, 10, 10);
            let derived = derive_attributes(&raw, AgeCategory::Adult, Kin::Human).unwrap();
            assert_eq!(derived.damage_bonus_str, DamageBonus::D6);
            assert_eq!(derived.damage_bonus_agl, DamageBonus::D4);
        }

        #[test]
        fn pools_follow_final_con_and_wil() {
            let raw = Attributes::new(10, 12, 10, 10, 11, 10);
            let derived = derive_attributes(&raw, AgeCategory::Young, Kin::Human).unwrap();
            assert_eq!(derived.max_hp, 13);
            assert_eq!(derived.max_wp, 11);
        }

        #[test]
        fn final_values_are_not_clamped() {
            let raw = Attributes::uniform(3);
            let derived = derive_attributes(&raw, AgeCategory::Old, Kin::Dwarf).unwrap();
            assert_eq!(derived.final_value(Attribute::Agl), 1);
            assert_eq!(derived.movement, 4);
        }

        #[test]
        fn rejects_out_of_range_raw() {
            let raw = Attributes::uniform(10).with(Attribute::Wil, 19);
            let err = derive_attributes(&raw, AgeCategory::Adult, Kin::Elf).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    mod rolling {
        use super::*;

        #[test]
        fn drops_single_lowest() {
            let mut roll = scripted(vec![2, 5, 2, 6]);
            let result = roll_attribute(&mut roll);
            assert_eq!(result.dropped, 2);
            assert_eq!(result.total, 13);
        }

        #[test]
        fn extremes_stay_in_raw_range() {
            let mut ones = |_: u8| 1;
            assert_eq!(roll_attribute(&mut ones).total, 3);
            let mut sixes = |_: u8| 6;
            assert_eq!(roll_attribute(&mut sixes).total, 18);
        }

        #[test]
        fn rolls_all_six_in_order() {
            let mut roll = scripted((0..24).map(|i| (i % 6 + 1) as u8).collect());
            let (attributes, rolls) = roll_attributes(&mut roll);
            assert_eq!(rolls.len(), 6);
            assert!(attributes.validate_raw().is_ok());
            // first roll: 1,2,3,4 -> drop 1
            assert_eq!(attributes.strength, 9);
        }
    }
}
