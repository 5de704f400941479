//! Dice value objects and parsing
//!
//! Supports dice compositions like "1d20", "2d6", "d20+1d6". Rolls carry no
//! flat modifiers; a composition is only a list of (die size, count) groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Size of the die used for skill checks.
pub const D20: u8 = 20;

/// Error when parsing a dice composition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected XdY terms joined by '+'
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
}

/// `count` dice of `size` sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceGroup {
    pub size: u8,
    pub count: u8,
}

impl DiceGroup {
    pub fn new(size: u8, count: u8) -> Result<Self, DiceParseError> {
        if count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        Ok(Self { size, count })
    }

    fn parse(term: &str) -> Result<Self, DiceParseError> {
        let d_pos = term.find('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", term))
        })?;

        let count_str = &term[..d_pos];
        let count: u8 = if count_str.is_empty() {
            1 // "d20" means "1d20"
        } else {
            count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", count_str))
            })?
        };

        let size_str = &term[d_pos + 1..];
        let size: u8 = size_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", size_str))
        })?;

        Self::new(size, count)
    }
}

impl fmt::Display for DiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.size)
    }
}

/// An ordered dice composition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiceSpec(Vec<DiceGroup>);

impl DiceSpec {
    pub fn new(groups: Vec<DiceGroup>) -> Result<Self, DiceParseError> {
        if groups.is_empty() {
            return Err(DiceParseError::Empty);
        }
        Ok(Self(groups))
    }

    /// A single twenty-sided die: the standard skill check.
    pub fn d20() -> Self {
        Self(vec![DiceGroup { size: D20, count: 1 }])
    }

    /// `count` dice of `size` sides.
    pub fn of(count: u8, size: u8) -> Result<Self, DiceParseError> {
        Ok(Self(vec![DiceGroup::new(size, count)?]))
    }

    /// Parse a composition like "1d20", "2d6", "d20 + 1d6".
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let groups = input
            .split('+')
            .map(|term| DiceGroup::parse(term.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(groups)
    }

    pub fn groups(&self) -> &[DiceGroup] {
        &self.0
    }

    pub fn die_count(&self) -> usize {
        self.0.iter().map(|g| g.count as usize).sum()
    }

    pub fn d20_count(&self) -> usize {
        self.0
            .iter()
            .filter(|g| g.size == D20)
            .map(|g| g.count as usize)
            .sum()
    }

    pub fn contains_d20(&self) -> bool {
        self.d20_count() > 0
    }

    /// A composition resolves as a skill check only with exactly one d20.
    pub fn is_single_d20(&self) -> bool {
        self.d20_count() == 1
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.0.iter().map(|g| g.to_string()).collect();
        write!(f, "{}", terms.join("+"))
    }
}

/// The outcome of one die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DieResult {
    pub size: u8,
    pub value: u8,
}

/// Roll modifier. Boon and bane are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollModifier {
    #[default]
    None,
    /// Roll the d20 twice and keep the lower result.
    Boon,
    /// Roll the d20 twice and keep the higher result.
    Bane,
}

impl RollModifier {
    /// Pick the kept result out of two d20 draws; returns `(kept, discarded)`.
    pub fn select(self, first: u8, second: u8) -> (u8, u8) {
        match self {
            RollModifier::Boon => (first.min(second), first.max(second)),
            RollModifier::Bane => (first.max(second), first.min(second)),
            RollModifier::None => (first, second),
        }
    }
}

/// How a skill check resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Natural 1. Always a success; the skill may be marked.
    Dragon,
    Success,
    Failure,
    /// Natural 20. Always a failure; the skill may be marked.
    Demon,
}

impl CheckOutcome {
    /// Resolve a d20 result against a skill value.
    pub fn resolve(d20: u8, skill_value: u8) -> Self {
        match d20 {
            1 => CheckOutcome::Dragon,
            D20 => CheckOutcome::Demon,
            n if n <= skill_value => CheckOutcome::Success,
            _ => CheckOutcome::Failure,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, CheckOutcome::Dragon | CheckOutcome::Success)
    }

    /// Dragon and Demon both let the player mark the skill.
    pub fn triggers_mark(self) -> bool {
        matches!(self, CheckOutcome::Dragon | CheckOutcome::Demon)
    }
}

/// One roll action. Ephemeral: kept in the session history, never persisted
/// with the character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub dice: DiceSpec,
    /// Individual results, in composition order. Under boon/bane the kept
    /// d20 draw is listed here.
    pub results: Vec<DieResult>,
    pub total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_value: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CheckOutcome>,
    pub modifier: RollModifier,
    /// The d20 draw dropped by boon/bane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discarded: Option<u8>,
    pub pushed: bool,
    pub rolled_at: DateTime<Utc>,
}

impl DiceRoll {
    /// `Some(success)` for skill checks, `None` for plain rolls.
    pub fn success(&self) -> Option<bool> {
        self.outcome.map(CheckOutcome::is_success)
    }

    /// The first d20 result, if any.
    pub fn d20_result(&self) -> Option<u8> {
        self.results.iter().find(|r| r.size == D20).map(|r| r.value)
    }

    pub fn contains_d20(&self) -> bool {
        self.dice.contains_d20()
    }

    pub fn triggers_mark(&self) -> bool {
        self.outcome.is_some_and(CheckOutcome::triggers_mark)
    }

    /// Format as a breakdown string (e.g., "1d20(4|15 boon) vs 10: success").
    pub fn breakdown(&self) -> String {
        let values: Vec<String> = self.results.iter().map(|r| r.value.to_string()).collect();
        let mut text = if self.results.len() == 1 {
            format!("{}({})", self.dice, values.join(", "))
        } else {
            format!("{}[{}] = {}", self.dice, values.join(", "), self.total)
        };

        if let Some(discarded) = self.discarded {
            let label = match self.modifier {
                RollModifier::Boon => "boon",
                RollModifier::Bane => "bane",
                RollModifier::None => "",
            };
            text.push_str(&format!(" (dropped {} for {})", discarded, label));
        }

        if let (Some(skill), Some(outcome)) = (self.skill_value, self.outcome) {
            let verdict = match outcome {
                CheckOutcome::Dragon => "dragon!",
                CheckOutcome::Success => "success",
                CheckOutcome::Failure => "failure",
                CheckOutcome::Demon => "demon!",
            };
            text.push_str(&format!(" vs {}: {}", skill, verdict));
        }

        if self.pushed {
            text.push_str(" [pushed]");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_d20() {
        let spec = DiceSpec::parse("1d20").unwrap();
        assert_eq!(spec, DiceSpec::d20());
        assert!(spec.is_single_d20());
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(DiceSpec::parse("d20").unwrap(), DiceSpec::d20());
    }

    #[test]
    fn test_parse_multiple_groups() {
        let spec = DiceSpec::parse(" 1D20 + 2d6 ").unwrap();
        assert_eq!(
            spec.groups(),
            &[
                DiceGroup { size: 20, count: 1 },
                DiceGroup { size: 6, count: 2 }
            ]
        );
        assert_eq!(spec.die_count(), 3);
        assert_eq!(spec.to_string(), "1d20+2d6");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(DiceSpec::parse(""), Err(DiceParseError::Empty));
        assert!(matches!(
            DiceSpec::parse("20"),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert_eq!(
            DiceSpec::parse("0d6"),
            Err(DiceParseError::InvalidDiceCount)
        );
        assert_eq!(DiceSpec::parse("1d1"), Err(DiceParseError::InvalidDieSize));
        assert!(matches!(
            DiceSpec::parse("1d20+5"),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_two_d20_is_not_a_skill_check() {
        let spec = DiceSpec::parse("2d20").unwrap();
        assert!(spec.contains_d20());
        assert!(!spec.is_single_d20());
    }

    #[test]
    fn test_boon_keeps_lower_bane_keeps_higher() {
        assert_eq!(RollModifier::Boon.select(4, 15), (4, 15));
        assert_eq!(RollModifier::Boon.select(15, 4), (4, 15));
        assert_eq!(RollModifier::Bane.select(4, 15), (15, 4));
    }

    #[test]
    fn test_check_outcome_boundaries() {
        assert_eq!(CheckOutcome::resolve(1, 0), CheckOutcome::Dragon);
        assert_eq!(CheckOutcome::resolve(20, 20), CheckOutcome::Demon);
        assert_eq!(CheckOutcome::resolve(10, 10), CheckOutcome::Success);
        assert_eq!(CheckOutcome::resolve(11, 10), CheckOutcome::Failure);
        assert!(CheckOutcome::Dragon.is_success());
        assert!(!CheckOutcome::Demon.is_success());
        assert!(CheckOutcome::Demon.triggers_mark());
        assert!(!CheckOutcome::Success.triggers_mark());
    }

    #[test]
    fn test_breakdown() {
        let roll = DiceRoll {
            dice: DiceSpec::d20(),
            results: vec![DieResult { size: 20, value: 4 }],
            total: 4,
            skill_value: Some(10),
            outcome: Some(CheckOutcome::Success),
            modifier: RollModifier::Boon,
            discarded: Some(15),
            pushed: false,
            rolled_at: Utc::now(),
        };
        assert_eq!(
            roll.breakdown(),
            "1d20(4) (dropped 15 for boon) vs 10: success"
        );
    }
}
