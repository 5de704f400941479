//! The six conditions
//!
//! Each condition is bound to exactly one attribute. While a condition is
//! active, every roll against that attribute or a skill keyed off it is made
//! with a bane. Conditions never expire on their own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{skills_keyed_by, Attribute, SkillDefinition};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Exhausted,
    Sickly,
    Dazed,
    Angry,
    Scared,
    Disheartened,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::Exhausted,
        Condition::Sickly,
        Condition::Dazed,
        Condition::Angry,
        Condition::Scared,
        Condition::Disheartened,
    ];

    /// The attribute this condition penalizes.
    pub fn attribute(self) -> Attribute {
        match self {
            Condition::Exhausted => Attribute::Str,
            Condition::Sickly => Attribute::Con,
            Condition::Dazed => Attribute::Agl,
            Condition::Angry => Attribute::Int,
            Condition::Scared => Attribute::Wil,
            Condition::Disheartened => Attribute::Cha,
        }
    }

    /// The condition bound to `attribute`.
    pub fn for_attribute(attribute: Attribute) -> Self {
        match attribute {
            Attribute::Str => Condition::Exhausted,
            Attribute::Con => Condition::Sickly,
            Attribute::Agl => Condition::Dazed,
            Attribute::Int => Condition::Angry,
            Attribute::Wil => Condition::Scared,
            Attribute::Cha => Condition::Disheartened,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::Exhausted => "exhausted",
            Condition::Sickly => "sickly",
            Condition::Dazed => "dazed",
            Condition::Angry => "angry",
            Condition::Scared => "scared",
            Condition::Disheartened => "disheartened",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown condition: {}", s)))
    }
}

/// Active/inactive state of all six conditions.
///
/// Field names are the persisted schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditions {
    pub exhausted: bool,
    pub sickly: bool,
    pub dazed: bool,
    pub angry: bool,
    pub scared: bool,
    pub disheartened: bool,
}

impl Conditions {
    /// No conditions active.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_active(&self, condition: Condition) -> bool {
        match condition {
            Condition::Exhausted => self.exhausted,
            Condition::Sickly => self.sickly,
            Condition::Dazed => self.dazed,
            Condition::Angry => self.angry,
            Condition::Scared => self.scared,
            Condition::Disheartened => self.disheartened,
        }
    }

    pub fn set(&mut self, condition: Condition, active: bool) {
        let slot = match condition {
            Condition::Exhausted => &mut self.exhausted,
            Condition::Sickly => &mut self.sickly,
            Condition::Dazed => &mut self.dazed,
            Condition::Angry => &mut self.angry,
            Condition::Scared => &mut self.scared,
            Condition::Disheartened => &mut self.disheartened,
        };
        *slot = active;
    }

    /// Return a copy with `condition` negated. Other conditions are untouched.
    #[must_use]
    pub fn toggle(self, condition: Condition) -> Self {
        let mut next = self;
        next.set(condition, !self.is_active(condition));
        next
    }

    /// Return a copy with every condition cleared.
    #[must_use]
    pub fn cleared(self) -> Self {
        Self::none()
    }

    pub fn active(&self) -> impl Iterator<Item = Condition> + '_ {
        Condition::ALL.into_iter().filter(move |c| self.is_active(*c))
    }

    pub fn any_active(&self) -> bool {
        self.active().next().is_some()
    }

    /// True if rolls against `attribute` must be made with a bane.
    pub fn banes_attribute(&self, attribute: Attribute) -> bool {
        self.is_active(Condition::for_attribute(attribute))
    }

    pub fn penalized_attributes(&self) -> Vec<Attribute> {
        self.active().map(Condition::attribute).collect()
    }

    /// Every skill that currently rolls with a bane because of a condition.
    pub fn penalized_skills(&self) -> Vec<&'static SkillDefinition> {
        self.active()
            .flat_map(|c| skills_keyed_by(c.attribute()))
            .collect()
    }
}
