//! Advancement use cases.
//!
//! Level is the number of distinct marked skills. Milestone levels unlock
//! rewards; each reward can be taken once per milestone.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use sheetsmith_domain::{AdvancementChoice, AdvancementKind, AdvancementOutcome, CharacterId};

use super::error::CharacterError;
use super::sheet::{self, SheetUpdate};
use crate::infrastructure::ports::{CharacterRepo, ClockPort};

/// Rewards open to a character right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancementSummary {
    pub level: u32,
    pub available: BTreeSet<AdvancementKind>,
}

/// Container for advancement use cases.
pub struct AdvancementUseCases {
    repo: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
}

impl AdvancementUseCases {
    pub fn new(repo: Arc<dyn CharacterRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    pub async fn available(&self, id: CharacterId) -> Result<AdvancementSummary, CharacterError> {
        let character = sheet::load(self.repo.as_ref(), id).await?;
        Ok(AdvancementSummary {
            level: character.level(),
            available: character.available_advancements(),
        })
    }

    /// Take one reward at the current milestone.
    pub async fn apply(
        &self,
        id: CharacterId,
        choice: AdvancementChoice,
    ) -> Result<SheetUpdate<AdvancementOutcome>, CharacterError> {
        let mut character = sheet::load(self.repo.as_ref(), id).await?;
        let level = character.level();
        let outcome = character.apply_advancement(choice, self.clock.now())?;

        tracing::info!(
            character_id = %id,
            level,
            kind = %outcome.kind(),
            "Applied advancement"
        );
        sheet::save(self.repo.as_ref(), character, outcome).await
    }
}
