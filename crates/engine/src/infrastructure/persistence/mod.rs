//! Character storage adapters.
//!
//! Both adapters keep sheets as JSON documents so they share one decode path:
//! legacy gear prose is migrated before the sheet is deserialized.

mod json_dir;
mod memory;

pub use json_dir::JsonDirCharacterRepo;
pub use memory::InMemoryCharacterRepo;

use serde_json::Value;
use sheetsmith_domain::PlayerCharacter;

use crate::infrastructure::legacy_effects;
use crate::infrastructure::ports::RepoError;

/// Serialize a sheet for storage.
pub fn encode_sheet(character: &PlayerCharacter) -> Result<String, RepoError> {
    serde_json::to_string_pretty(character).map_err(RepoError::serialization)
}

/// Parse a stored sheet, migrating legacy gear effects first.
pub fn decode_sheet(json: &str) -> Result<PlayerCharacter, RepoError> {
    let mut value: Value = serde_json::from_str(json).map_err(RepoError::serialization)?;
    let migrated = legacy_effects::migrate_gear(&mut value);
    if migrated > 0 {
        tracing::debug!(migrated, "Migrated legacy gear effects");
    }
    serde_json::from_value(value).map_err(RepoError::serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sheetsmith_domain::{
        AgeCategory, Attributes, CharacterName, Effect, Kin, Profession, RollModifier,
    };

    #[test]
    fn legacy_gear_is_migrated_on_decode() {
        let pc = PlayerCharacter::new(
            CharacterName::new("Aldo").unwrap(),
            Kin::Human,
            AgeCategory::Adult,
            Profession::Thief,
            None,
            Attributes::uniform(12),
            Utc::now(),
        )
        .unwrap();
        let mut value = serde_json::to_value(&pc).unwrap();
        value["gear"] = serde_json::json!(["Lantern: Bane on Sneaking"]);

        let decoded = decode_sheet(&value.to_string()).unwrap();
        assert_eq!(
            decoded.gear()[0].effect,
            Effect::BaneOnSkill {
                skill: "Sneaking".to_string()
            }
        );
        let check = decoded.prepare_check("Sneaking", RollModifier::Boon).unwrap();
        assert_eq!(check.modifier, RollModifier::Bane);
    }

    #[test]
    fn malformed_sheet_is_a_serialization_error() {
        let err = decode_sheet("{\"name\": 3}").unwrap_err();
        assert!(matches!(err, RepoError::Serialization(_)));
    }

    #[test]
    fn out_of_range_attributes_are_rejected_on_decode() {
        let pc = PlayerCharacter::new(
            CharacterName::new("Aldo").unwrap(),
            Kin::Human,
            AgeCategory::Adult,
            Profession::Thief,
            None,
            Attributes::uniform(12),
            Utc::now(),
        )
        .unwrap();
        let mut value = serde_json::to_value(&pc).unwrap();
        value["attributes"]["str"] = serde_json::json!(25);
        assert!(decode_sheet(&value.to_string()).is_err());
    }
}
