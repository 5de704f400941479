//! Load and save helpers shared by the character use cases.

use serde::Serialize;
use sheetsmith_domain::{CharacterId, PlayerCharacter};

use super::error::CharacterError;
use crate::infrastructure::ports::CharacterRepo;

/// A saved sheet together with what the operation did to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetUpdate<T> {
    pub character: PlayerCharacter,
    pub outcome: T,
}

pub(crate) async fn load(
    repo: &dyn CharacterRepo,
    id: CharacterId,
) -> Result<PlayerCharacter, CharacterError> {
    repo.get(id)
        .await?
        .ok_or(CharacterError::CharacterNotFound(id))
}

/// Save `character` over the version it was loaded at.
pub(crate) async fn save<T>(
    repo: &dyn CharacterRepo,
    mut character: PlayerCharacter,
    outcome: T,
) -> Result<SheetUpdate<T>, CharacterError> {
    let expected = character.bump_version();
    if let Err(e) = repo.save(&character, expected).await {
        if e.is_conflict() {
            tracing::warn!(
                character_id = %character.id(),
                expected_version = expected,
                "Sheet was changed elsewhere, save rejected"
            );
        }
        return Err(e.into());
    }
    Ok(SheetUpdate { character, outcome })
}
