//! Kin: base movement and innate abilities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Ability;
use crate::error::DomainError;

/// A character's kin. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kin {
    Human,
    Halfling,
    Dwarf,
    Elf,
    Mallard,
    Wolfkin,
}

impl Kin {
    pub const ALL: [Kin; 6] = [
        Kin::Human,
        Kin::Halfling,
        Kin::Dwarf,
        Kin::Elf,
        Kin::Mallard,
        Kin::Wolfkin,
    ];

    /// Movement rate before the agility adjustment.
    pub fn base_movement(self) -> i32 {
        match self {
            Kin::Human | Kin::Elf => 10,
            Kin::Halfling | Kin::Dwarf | Kin::Mallard => 8,
            Kin::Wolfkin => 12,
        }
    }

    /// Innate abilities every member of the kin starts with.
    pub fn abilities(self) -> Vec<Ability> {
        match self {
            Kin::Human => vec![Ability::new(
                "Adaptive",
                Some(3),
                "Roll a different skill than the situation calls for, if the GM agrees it fits.",
            )],
            Kin::Halfling => vec![Ability::new(
                "Hard to Catch",
                Some(3),
                "Gain a boon when rolling Evade.",
            )],
            Kin::Dwarf => vec![Ability::new(
                "Unforgiving",
                Some(3),
                "Gain a boon when attacking someone who has wronged you.",
            )],
            Kin::Elf => vec![Ability::new(
                "Inner Peace",
                None,
                "Meditate during a stretch rest to heal an extra D6 HP and WP \
                 and recover from one more condition.",
            )],
            Kin::Mallard => vec![
                Ability::new(
                    "Ill-Tempered",
                    None,
                    "Take the Angry condition to gain a boon on a roll (not INT-based).",
                ),
                Ability::new("Webbed Feet", None, "Gain a boon on all Swimming rolls."),
            ],
            Kin::Wolfkin => vec![Ability::new(
                "Hunting Instincts",
                Some(3),
                "Designate a creature you can smell as prey and track it by scent.",
            )],
        }
    }
}

impl fmt::Display for Kin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kin::Human => "Human",
            Kin::Halfling => "Halfling",
            Kin::Dwarf => "Dwarf",
            Kin::Elf => "Elf",
            Kin::Mallard => "Mallard",
            Kin::Wolfkin => "Wolfkin",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Kin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kin::ALL
            .into_iter()
            .find(|k| k.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown kin: {}", s)))
    }
}
