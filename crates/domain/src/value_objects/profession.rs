//! Professions and schools of magic

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profession {
    Artisan,
    Bard,
    Fighter,
    Hunter,
    Knight,
    Mage,
    Mariner,
    Merchant,
    Scholar,
    Thief,
}

impl Profession {
    pub const ALL: [Profession; 10] = [
        Profession::Artisan,
        Profession::Bard,
        Profession::Fighter,
        Profession::Hunter,
        Profession::Knight,
        Profession::Mage,
        Profession::Mariner,
        Profession::Merchant,
        Profession::Scholar,
        Profession::Thief,
    ];

    pub fn is_mage(self) -> bool {
        matches!(self, Profession::Mage)
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profession::Artisan => "Artisan",
            Profession::Bard => "Bard",
            Profession::Fighter => "Fighter",
            Profession::Hunter => "Hunter",
            Profession::Knight => "Knight",
            Profession::Mage => "Mage",
            Profession::Mariner => "Mariner",
            Profession::Merchant => "Merchant",
            Profession::Scholar => "Scholar",
            Profession::Thief => "Thief",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Profession {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profession::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown profession: {}", s)))
    }
}

/// School of magic a mage studies. Each school is also a WIL-keyed skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagicSchool {
    Animism,
    Elementalism,
    Mentalism,
}

impl MagicSchool {
    pub const ALL: [MagicSchool; 3] = [
        MagicSchool::Animism,
        MagicSchool::Elementalism,
        MagicSchool::Mentalism,
    ];

    /// Name of the skill used to cast spells of this school.
    pub fn skill_name(self) -> &'static str {
        match self {
            MagicSchool::Animism => "Animism",
            MagicSchool::Elementalism => "Elementalism",
            MagicSchool::Mentalism => "Mentalism",
        }
    }
}

impl fmt::Display for MagicSchool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.skill_name())
    }
}

impl FromStr for MagicSchool {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MagicSchool::ALL
            .into_iter()
            .find(|m| m.skill_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown school of magic: {}", s)))
    }
}
