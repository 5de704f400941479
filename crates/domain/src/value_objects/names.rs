//! Validated name newtypes
//!
//! Names are valid by construction: non-empty, within length limits and
//! trimmed of leading/trailing whitespace.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for a character name
const MAX_NAME_LENGTH: usize = 100;

/// A validated character name (non-empty, <=100 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Create a new validated character name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 100 characters after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Character name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CharacterName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CharacterName> for String {
    fn from(name: CharacterName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_name() {
        let name = CharacterName::new("Ylva Bronzebeard").unwrap();
        assert_eq!(name.as_str(), "Ylva Bronzebeard");
        assert_eq!(name.to_string(), "Ylva Bronzebeard");
    }

    #[test]
    fn empty_name_rejected() {
        let err = CharacterName::new("").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn whitespace_only_rejected() {
        assert!(CharacterName::new("   ").is_err());
    }

    #[test]
    fn name_is_trimmed() {
        let name = CharacterName::new("  Quackard  ").unwrap();
        assert_eq!(name.as_str(), "Quackard");
    }

    #[test]
    fn too_long_rejected() {
        assert!(CharacterName::new("a".repeat(101)).is_err());
        assert!(CharacterName::new("a".repeat(100)).is_ok());
    }

    #[test]
    fn deserialize_validates() {
        let parsed: Result<CharacterName, _> = serde_json::from_str("\"  \"");
        assert!(parsed.is_err());
    }
}
