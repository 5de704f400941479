//! Character creation errors.

use crate::infrastructure::ports::RepoError;
use sheetsmith_domain::{DomainError, DraftId};

/// Errors that can occur during character creation.
#[derive(Debug, thiserror::Error)]
pub enum CreationError {
    #[error("Draft not found: {0}")]
    DraftNotFound(DraftId),

    #[error("Rules error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
