//! The six character attributes
//!
//! Attribute scores are plain integers. Raw (creation-time) scores live in
//! [3, 18]; final scores (raw + age modifier) are deliberately unbounded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Lowest raw attribute score allowed at creation time.
pub const MIN_RAW_ATTRIBUTE: i32 = 3;
/// Highest raw attribute score allowed at creation time.
pub const MAX_RAW_ATTRIBUTE: i32 = 18;

/// One of the six attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Attribute {
    Str,
    Con,
    Agl,
    Int,
    Wil,
    Cha,
}

impl Attribute {
    /// All attributes in sheet order.
    pub const ALL: [Attribute; 6] = [
        Attribute::Str,
        Attribute::Con,
        Attribute::Agl,
        Attribute::Int,
        Attribute::Wil,
        Attribute::Cha,
    ];

    /// Short uppercase code, as printed on the sheet.
    pub const fn code(self) -> &'static str {
        match self {
            Attribute::Str => "STR",
            Attribute::Con => "CON",
            Attribute::Agl => "AGL",
            Attribute::Int => "INT",
            Attribute::Wil => "WIL",
            Attribute::Cha => "CHA",
        }
    }

    /// Full attribute name.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Str => "Strength",
            Attribute::Con => "Constitution",
            Attribute::Agl => "Agility",
            Attribute::Int => "Intelligence",
            Attribute::Wil => "Willpower",
            Attribute::Cha => "Charisma",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Attribute {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Attribute::ALL
            .into_iter()
            .find(|a| a.code().eq_ignore_ascii_case(s) || a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::parse(format!("Unknown attribute: {}", s)))
    }
}

/// A full set of attribute scores.
///
/// Used both for raw scores and for final (age-adjusted) scores; which one a
/// value holds is decided by where it came from, not by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(rename = "str")]
    pub strength: i32,
    #[serde(rename = "con")]
    pub constitution: i32,
    #[serde(rename = "agl")]
    pub agility: i32,
    #[serde(rename = "int")]
    pub intelligence: i32,
    #[serde(rename = "wil")]
    pub willpower: i32,
    #[serde(rename = "cha")]
    pub charisma: i32,
}

impl Attributes {
    pub fn new(
        strength: i32,
        constitution: i32,
        agility: i32,
        intelligence: i32,
        willpower: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            constitution,
            agility,
            intelligence,
            willpower,
            charisma,
        }
    }

    /// Every attribute set to the same score.
    pub fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Str => self.strength,
            Attribute::Con => self.constitution,
            Attribute::Agl => self.agility,
            Attribute::Int => self.intelligence,
            Attribute::Wil => self.willpower,
            Attribute::Cha => self.charisma,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: i32) {
        match attribute {
            Attribute::Str => self.strength = value,
            Attribute::Con => self.constitution = value,
            Attribute::Agl => self.agility = value,
            Attribute::Int => self.intelligence = value,
            Attribute::Wil => self.willpower = value,
            Attribute::Cha => self.charisma = value,
        }
    }

    pub fn with(mut self, attribute: Attribute, value: i32) -> Self {
        self.set(attribute, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i32)> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    /// Check that every score is a legal raw (creation-time) value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming the first out-of-range
    /// attribute. Values are never clamped.
    pub fn validate_raw(&self) -> Result<(), DomainError> {
        for (attribute, value) in self.iter() {
            validate_raw_value(attribute, value)?;
        }
        Ok(())
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::uniform(10)
    }
}

/// Check a single raw attribute score.
pub fn validate_raw_value(attribute: Attribute, value: i32) -> Result<(), DomainError> {
    if !(MIN_RAW_ATTRIBUTE..=MAX_RAW_ATTRIBUTE).contains(&value) {
        return Err(DomainError::validation(format!(
            "{} must be between {} and {}, got {}",
            attribute, MIN_RAW_ATTRIBUTE, MAX_RAW_ATTRIBUTE, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes_and_names() {
        assert_eq!("str".parse::<Attribute>().unwrap(), Attribute::Str);
        assert_eq!("Willpower".parse::<Attribute>().unwrap(), Attribute::Wil);
        assert_eq!(" AGL ".parse::<Attribute>().unwrap(), Attribute::Agl);
        assert!("LUCK".parse::<Attribute>().is_err());
    }

    #[test]
    fn get_and_set_round_trip_every_attribute() {
        let mut attrs = Attributes::uniform(10);
        for (i, attribute) in Attribute::ALL.into_iter().enumerate() {
            attrs.set(attribute, 3 + i as i32);
        }
        assert_eq!(attrs, Attributes::new(3, 4, 5, 6, 7, 8));
        assert_eq!(attrs.get(Attribute::Cha), 8);
    }

    #[test]
    fn validate_raw_rejects_out_of_range() {
        assert!(Attributes::new(3, 18, 10, 10, 10, 10).validate_raw().is_ok());

        let err = Attributes::uniform(10)
            .with(Attribute::Agl, 19)
            .validate_raw()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("AGL"));

        assert!(Attributes::uniform(10)
            .with(Attribute::Str, 2)
            .validate_raw()
            .is_err());
    }

    #[test]
    fn serializes_with_short_keys() {
        let json = serde_json::to_value(Attributes::new(14, 12, 11, 10, 9, 8)).unwrap();
        assert_eq!(json["str"], 14);
        assert_eq!(json["cha"], 8);
    }
}
