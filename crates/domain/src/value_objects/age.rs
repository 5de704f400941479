//! Age categories and their creation-time adjustments

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Attribute;
use crate::error::DomainError;

/// Age category chosen at character creation. Immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    Young,
    #[default]
    Adult,
    Old,
}

impl AgeCategory {
    pub const ALL: [AgeCategory; 3] = [AgeCategory::Young, AgeCategory::Adult, AgeCategory::Old];

    /// Additive modifier applied to a raw attribute score.
    ///
    /// | age   | STR | CON | AGL | INT | WIL | CHA |
    /// |-------|-----|-----|-----|-----|-----|-----|
    /// | Young |  0  | +1  | +1  |  0  |  0  |  0  |
    /// | Adult |  0  |  0  |  0  |  0  |  0  |  0  |
    /// | Old   | -2  | -2  | -2  | +1  | +1  |  0  |
    pub fn attribute_modifier(self, attribute: Attribute) -> i32 {
        match (self, attribute) {
            (AgeCategory::Young, Attribute::Con | Attribute::Agl) => 1,
            (AgeCategory::Young, _) => 0,
            (AgeCategory::Adult, _) => 0,
            (AgeCategory::Old, Attribute::Str | Attribute::Con | Attribute::Agl) => -2,
            (AgeCategory::Old, Attribute::Int | Attribute::Wil) => 1,
            (AgeCategory::Old, Attribute::Cha) => 0,
        }
    }

    /// Number of skills a new character of this age may mark as trained.
    /// Only consulted during creation.
    pub fn trained_skill_allotment(self) -> usize {
        match self {
            AgeCategory::Young => 8,
            AgeCategory::Adult => 10,
            AgeCategory::Old => 12,
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeCategory::Young => write!(f, "young"),
            AgeCategory::Adult => write!(f, "adult"),
            AgeCategory::Old => write!(f, "old"),
        }
    }
}

impl FromStr for AgeCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeCategory::ALL
            .into_iter()
            .find(|a| a.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown age: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adult_has_no_modifiers() {
        for attribute in Attribute::ALL {
            assert_eq!(AgeCategory::Adult.attribute_modifier(attribute), 0);
        }
    }

    #[test]
    fn young_gains_con_and_agl() {
        let young = AgeCategory::Young;
        assert_eq!(young.attribute_modifier(Attribute::Con), 1);
        assert_eq!(young.attribute_modifier(Attribute::Agl), 1);
        assert_eq!(young.attribute_modifier(Attribute::Str), 0);
        assert_eq!(young.attribute_modifier(Attribute::Cha), 0);
    }

    #[test]
    fn old_trades_body_for_mind() {
        let old = AgeCategory::Old;
        let modifiers: Vec<i32> = Attribute::ALL
            .into_iter()
            .map(|a| old.attribute_modifier(a))
            .collect();
        assert_eq!(modifiers, vec![-2, -2, -2, 1, 1, 0]);
    }

    #[test]
    fn older_characters_train_more_skills() {
        assert!(
            AgeCategory::Young.trained_skill_allotment()
                < AgeCategory::Adult.trained_skill_allotment()
        );
        assert_eq!(AgeCategory::Old.trained_skill_allotment(), 12);
    }

    #[test]
    fn parses_display_names() {
        assert_eq!("Old".parse::<AgeCategory>().unwrap(), AgeCategory::Old);
        assert!("ancient".parse::<AgeCategory>().is_err());
    }
}
