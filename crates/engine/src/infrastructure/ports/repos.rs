//! Repository port traits for character storage.

use async_trait::async_trait;
use sheetsmith_domain::{CharacterId, PlayerCharacter};

use super::error::RepoError;

// =============================================================================
// Character Storage
// =============================================================================

/// Durable storage for character sheets.
///
/// Saves are optimistic: `expected_version` is the version the caller loaded
/// (0 for a sheet that has never been saved). A mismatch with what is stored
/// fails with `RepoError::VersionConflict` and writes nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<PlayerCharacter>, RepoError>;
    async fn save(
        &self,
        character: &PlayerCharacter,
        expected_version: u64,
    ) -> Result<(), RepoError>;
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<PlayerCharacter>, RepoError>;
}
