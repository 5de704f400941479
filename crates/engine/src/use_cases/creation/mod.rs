//! Character creation use cases.
//!
//! Each creation flow owns one `CharacterBuilder`, addressed by a `DraftId`.
//! Drafts live only in memory; a committed draft becomes a saved sheet.

mod error;

pub use error::CreationError;

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use sheetsmith_domain::{
    derive_attributes, AttributeRoll, CharacterBuilder, CharacterDraft, CreationField,
    DerivedStats, DraftId, PlayerCharacter,
};

use crate::infrastructure::ports::{CharacterRepo, ClockPort, RandomPort};

/// A draft together with its stats so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftView {
    pub draft_id: DraftId,
    pub draft: CharacterDraft,
    /// Present once kin and attributes are set.
    pub preview: Option<DerivedStats>,
}

/// Container for character creation use cases.
pub struct CreationUseCases {
    repo: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    drafts: DashMap<DraftId, CharacterBuilder>,
}

impl CreationUseCases {
    pub fn new(
        repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            repo,
            clock,
            random,
            drafts: DashMap::new(),
        }
    }

    /// Begin a new draft.
    pub fn start(&self) -> DraftView {
        let draft_id = DraftId::from_uuid(self.random.gen_uuid());
        let mut builder = CharacterBuilder::new();
        let draft = builder.start().clone();
        self.drafts.insert(draft_id, builder);

        tracing::info!(draft_id = %draft_id, "Started character creation");
        DraftView {
            draft_id,
            draft,
            preview: None,
        }
    }

    pub fn get(&self, draft_id: DraftId) -> Result<DraftView, CreationError> {
        let builder = self
            .drafts
            .get(&draft_id)
            .ok_or(CreationError::DraftNotFound(draft_id))?;
        let draft = builder.draft().cloned().unwrap_or_default();
        Ok(view(draft_id, draft))
    }

    /// Apply one field edit to a draft.
    pub fn update_field(
        &self,
        draft_id: DraftId,
        field: CreationField,
    ) -> Result<DraftView, CreationError> {
        let mut builder = self
            .drafts
            .get_mut(&draft_id)
            .ok_or(CreationError::DraftNotFound(draft_id))?;
        let draft = builder.update_field(field.clone())?.clone();
        drop(builder);

        tracing::debug!(draft_id = %draft_id, field = ?field, "Updated draft field");
        Ok(view(draft_id, draft))
    }

    /// Roll 4d6-drop-lowest for every attribute.
    pub fn roll_attributes(
        &self,
        draft_id: DraftId,
    ) -> Result<(DraftView, Vec<AttributeRoll>), CreationError> {
        let mut builder = self
            .drafts
            .get_mut(&draft_id)
            .ok_or(CreationError::DraftNotFound(draft_id))?;
        let mut die = |size: u8| self.random.roll_die(size);
        let rolls = builder.roll_attributes(&mut die)?;
        let draft = builder.draft().cloned().unwrap_or_default();
        drop(builder);

        tracing::info!(
            draft_id = %draft_id,
            totals = ?rolls.iter().map(|r| r.total).collect::<Vec<_>>(),
            "Rolled attributes"
        );
        Ok((view(draft_id, draft), rolls))
    }

    /// Validate the draft and save the new character.
    ///
    /// A draft that fails validation, or whose save fails, is kept so the
    /// player can fix it and try again.
    pub async fn commit(&self, draft_id: DraftId) -> Result<PlayerCharacter, CreationError> {
        // Work on a copy; no map guard is held across the save
        let mut builder = self
            .drafts
            .get(&draft_id)
            .map(|entry| entry.value().clone())
            .ok_or(CreationError::DraftNotFound(draft_id))?;

        let mut character = builder.commit(self.clock.now())?;
        let expected = character.bump_version();
        self.repo.save(&character, expected).await?;
        self.drafts.remove(&draft_id);

        tracing::info!(
            draft_id = %draft_id,
            character_id = %character.id(),
            name = %character.name(),
            "Created character"
        );
        Ok(character)
    }

    /// Throw a draft away.
    pub fn reset(&self, draft_id: DraftId) -> Result<(), CreationError> {
        self.drafts
            .remove(&draft_id)
            .map(|_| ())
            .ok_or(CreationError::DraftNotFound(draft_id))?;
        tracing::info!(draft_id = %draft_id, "Discarded draft");
        Ok(())
    }

    pub fn open_drafts(&self) -> usize {
        self.drafts.len()
    }
}

fn view(draft_id: DraftId, draft: CharacterDraft) -> DraftView {
    let preview = match (draft.complete_attributes(), draft.kin) {
        (Some(attributes), Some(kin)) => derive_attributes(&attributes, draft.age, kin).ok(),
        _ => None,
    };
    DraftView {
        draft_id,
        draft,
        preview,
    }
}
