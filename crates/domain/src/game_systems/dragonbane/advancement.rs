//! Advancement: level from marked skills and milestone rewards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Profession;

/// A kind of milestone reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancementKind {
    /// +1 to one attribute.
    Attribute,
    /// Train a new skill.
    Skill,
    /// Learn a spell. Mages only.
    Spell,
    /// Gain a heroic ability. Everyone but mages.
    HeroicAbility,
}

impl fmt::Display for AdvancementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdvancementKind::Attribute => "attribute",
            AdvancementKind::Skill => "skill",
            AdvancementKind::Spell => "spell",
            AdvancementKind::HeroicAbility => "heroic ability",
        };
        write!(f, "{}", name)
    }
}

/// Level is the number of distinct marked skills.
pub fn level_of(marked_skills: &BTreeSet<String>) -> u32 {
    marked_skills.len() as u32
}

/// Rewards offered at `level`. Several may fire at once.
pub fn advancement_options(level: u32, profession: Profession) -> BTreeSet<AdvancementKind> {
    let mut options = BTreeSet::new();
    if level >= 4 && level % 4 == 0 {
        options.insert(AdvancementKind::Attribute);
    }
    if level >= 3 && level % 3 == 0 {
        options.insert(AdvancementKind::Skill);
    }
    if level >= 5 && level % 5 == 0 {
        options.insert(if profession.is_mage() {
            AdvancementKind::Spell
        } else {
            AdvancementKind::HeroicAbility
        });
    }
    options
}

/// A reward that has been taken at a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimedAdvancement {
    pub level: u32,
    pub kind: AdvancementKind,
}

/// Which milestone rewards have already been taken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvancementTracker {
    claimed: BTreeSet<ClaimedAdvancement>,
}

impl AdvancementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_claimed(claimed: impl IntoIterator<Item = ClaimedAdvancement>) -> Self {
        Self {
            claimed: claimed.into_iter().collect(),
        }
    }

    pub fn claimed(&self) -> impl Iterator<Item = &ClaimedAdvancement> {
        self.claimed.iter()
    }

    pub fn is_claimed(&self, level: u32, kind: AdvancementKind) -> bool {
        self.claimed.contains(&ClaimedAdvancement { level, kind })
    }

    /// Options at `level` not yet claimed at that level.
    pub fn available(&self, level: u32, profession: Profession) -> BTreeSet<AdvancementKind> {
        advancement_options(level, profession)
            .into_iter()
            .filter(|kind| !self.is_claimed(level, *kind))
            .collect()
    }

    /// Record that `kind` was taken at `level`.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidStateTransition` if `kind` is not offered at `level`
    /// - `DomainError::DuplicateSelection` if it was already claimed there
    pub fn claim(
        &mut self,
        level: u32,
        kind: AdvancementKind,
        profession: Profession,
    ) -> Result<ClaimedAdvancement, DomainError> {
        if !advancement_options(level, profession).contains(&kind) {
            return Err(DomainError::invalid_state_transition(format!(
                "No {} advancement is available at level {}",
                kind, level
            )));
        }
        let claim = ClaimedAdvancement { level, kind };
        if !self.claimed.insert(claim) {
            return Err(DomainError::duplicate(format!(
                "The {} advancement for level {} has already been taken",
                kind, level
            )));
        }
        Ok(claim)
    }
}
