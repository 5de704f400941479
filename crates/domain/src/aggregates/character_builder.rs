//! Character creation builder
//!
//! Creation is an explicit lifecycle: `start`, any number of `update_field`
//! calls, then `commit` or `reset`. The builder is owned by whoever runs the
//! creation flow; nothing about a draft is global.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::DomainError;
use crate::game_systems::dragonbane::{roll_attributes, AttributeRoll};
use crate::value_objects::{
    skill, validate_raw_value, AgeCategory, Attribute, Attributes, CharacterName, Kin,
    MagicSchool, Profession, SkillKind,
};

use super::PlayerCharacter;

/// One edit to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum CreationField {
    Name(String),
    Kin(Kin),
    Age(AgeCategory),
    Profession(Profession),
    MagicSchool(Option<MagicSchool>),
    Attributes(Attributes),
    Attribute(Attribute, i32),
    TrainSkill(String),
    UntrainSkill(String),
}

/// An in-progress character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDraft {
    pub name: Option<String>,
    pub kin: Option<Kin>,
    pub age: AgeCategory,
    pub profession: Option<Profession>,
    pub magic_school: Option<MagicSchool>,
    /// Raw scores entered or rolled so far.
    pub attributes: BTreeMap<Attribute, i32>,
    pub trained_skills: BTreeSet<String>,
}

impl CharacterDraft {
    /// Skills still to pick before the age allotment is used up.
    pub fn skills_remaining(&self) -> usize {
        self.age
            .trained_skill_allotment()
            .saturating_sub(self.trained_skills.len())
    }

    /// The full set of raw scores, once all six are present.
    pub fn complete_attributes(&self) -> Option<Attributes> {
        let mut attributes = Attributes::uniform(0);
        for attribute in Attribute::ALL {
            attributes.set(attribute, *self.attributes.get(&attribute)?);
        }
        Some(attributes)
    }

    pub fn missing_attributes(&self) -> Vec<Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(|a| !self.attributes.contains_key(a))
            .collect()
    }
}

/// Drives a single character through creation.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    draft: Option<CharacterDraft>,
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh draft, discarding any previous one.
    pub fn start(&mut self) -> &CharacterDraft {
        self.draft.insert(CharacterDraft::default())
    }

    pub fn draft(&self) -> Option<&CharacterDraft> {
        self.draft.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.draft.is_some()
    }

    /// Apply one edit to the draft.
    ///
    /// Values are checked as they arrive where that is possible without the
    /// rest of the sheet; cross-field rules are checked in `commit`.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidStateTransition` if no draft was started
    /// - `DomainError::Validation` for an out-of-range attribute or empty name
    /// - `DomainError::NotFound` for an unknown skill
    /// - `DomainError::DuplicateSelection` for a skill picked twice
    pub fn update_field(&mut self, field: CreationField) -> Result<&CharacterDraft, DomainError> {
        let draft = self.draft.as_mut().ok_or_else(not_started)?;

        match field {
            CreationField::Name(name) => {
                let name = CharacterName::new(name)?;
                draft.name = Some(name.into());
            }
            CreationField::Kin(kin) => draft.kin = Some(kin),
            CreationField::Age(age) => draft.age = age,
            CreationField::Profession(profession) => {
                draft.profession = Some(profession);
                if !profession.is_mage() {
                    draft.magic_school = None;
                }
            }
            CreationField::MagicSchool(school) => draft.magic_school = school,
            CreationField::Attributes(attributes) => {
                attributes.validate_raw()?;
                draft.attributes = attributes.iter().collect();
            }
            CreationField::Attribute(attribute, value) => {
                validate_raw_value(attribute, value)?;
                draft.attributes.insert(attribute, value);
            }
            CreationField::TrainSkill(name) => {
                let definition = skill(&name)?;
                if definition.kind == SkillKind::Magic {
                    return Err(DomainError::validation(
                        "Magic skills come from the chosen school",
                    ));
                }
                if !draft.trained_skills.insert(definition.name.to_string()) {
                    return Err(DomainError::duplicate(format!(
                        "{} is already trained",
                        definition.name
                    )));
                }
            }
            CreationField::UntrainSkill(name) => {
                let definition = skill(&name)?;
                draft.trained_skills.remove(definition.name);
            }
        }

        Ok(draft)
    }

    /// Roll all six attributes (4d6, drop lowest) into the draft.
    pub fn roll_attributes<R>(&mut self, roll: &mut R) -> Result<Vec<AttributeRoll>, DomainError>
    where
        R: FnMut(u8) -> u8,
    {
        let draft = self.draft.as_mut().ok_or_else(not_started)?;
        let (attributes, rolls) = roll_attributes(roll);
        draft.attributes = attributes.iter().collect();
        Ok(rolls)
    }

    /// Validate the draft and turn it into a character.
    ///
    /// On success the builder is emptied; on failure the draft is kept so the
    /// caller can fix it.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidStateTransition` if no draft was started
    /// - `DomainError::Validation` for missing fields, a bad magic school, or
    ///   more trained skills than the age allows
    pub fn commit(&mut self, now: DateTime<Utc>) -> Result<PlayerCharacter, DomainError> {
        let draft = self.draft.as_ref().ok_or_else(not_started)?;

        let name = CharacterName::new(draft.name.clone().unwrap_or_default())?;
        let kin = draft
            .kin
            .ok_or_else(|| DomainError::validation("Choose a kin"))?;
        let profession = draft
            .profession
            .ok_or_else(|| DomainError::validation("Choose a profession"))?;
        let attributes = draft.complete_attributes().ok_or_else(|| {
            let missing: Vec<_> = draft
                .missing_attributes()
                .iter()
                .map(|a| a.code())
                .collect();
            DomainError::validation(format!("Attributes not set: {}", missing.join(", ")))
        })?;

        let allotment = draft.age.trained_skill_allotment();
        if draft.trained_skills.len() > allotment {
            return Err(DomainError::validation(format!(
                "A {} character trains at most {} skills, {} chosen",
                draft.age,
                allotment,
                draft.trained_skills.len()
            )));
        }

        let character = PlayerCharacter::new(
            name,
            kin,
            draft.age,
            profession,
            draft.magic_school,
            attributes,
            now,
        )?
        .with_trained_skills(&draft.trained_skills)?;

        self.draft = None;
        Ok(character)
    }

    /// Throw the draft away.
    pub fn reset(&mut self) {
        self.draft = None;
    }
}

fn not_started() -> DomainError {
    DomainError::invalid_state_transition("Character creation has not been started")
}
