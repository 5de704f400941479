//! Errors shared by the use cases that act on a saved character.

use crate::infrastructure::ports::RepoError;
use sheetsmith_domain::{CharacterId, DomainError};

/// Errors that can occur while playing or advancing a character.
#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Rules error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl CharacterError {
    /// True when the save lost an optimistic-locking race; reload and retry.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CharacterError::Repo(e) if e.is_conflict())
    }
}
