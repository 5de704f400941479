//! Character storage as one JSON file per sheet.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sheetsmith_domain::{CharacterId, PlayerCharacter};
use tokio::sync::Mutex;

use super::{decode_sheet, encode_sheet};
use crate::infrastructure::ports::{CharacterRepo, RepoError};

/// Stores `<id>.json` files under a directory.
///
/// Version checks and writes are serialized through one lock, so the
/// optimistic check holds for every writer in this process.
pub struct JsonDirCharacterRepo {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonDirCharacterRepo {
    /// Open (and create if needed) the storage directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| RepoError::database("open", e))?;
        tracing::info!(path = %root.display(), "Opened character directory");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: CharacterId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Write through a sibling temp file, then rename over `path`.
    async fn write_atomically(path: &Path, json: String) -> Result<(), RepoError> {
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, json)
            .await
            .map_err(|e| RepoError::database("save", e))?;
        if let Err(e) = tokio::fs::rename(&staging, path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                tracing::warn!(
                    path = %staging.display(),
                    error = %cleanup,
                    "Could not remove staging file"
                );
            }
            return Err(RepoError::database("save", e));
        }
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Option<PlayerCharacter>, RepoError> {
        match tokio::fs::read_to_string(path).await {
            Ok(json) => decode_sheet(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepoError::database("read", e)),
        }
    }
}

#[async_trait]
impl CharacterRepo for JsonDirCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<PlayerCharacter>, RepoError> {
        self.read(&self.path_for(id)).await
    }

    async fn save(
        &self,
        character: &PlayerCharacter,
        expected_version: u64,
    ) -> Result<(), RepoError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path_for(character.id());

        let found = self
            .read(&path)
            .await?
            .map(|stored| stored.version())
            .unwrap_or(0);
        if found != expected_version {
            return Err(RepoError::version_conflict(
                character.id(),
                expected_version,
                found,
            ));
        }

        // Write then rename so a crash never leaves half a sheet behind
        let json = encode_sheet(character)?;
        Self::write_atomically(&path, json).await
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RepoError::not_found("Character", id))
            }
            Err(e) => Err(RepoError::database("delete", e)),
        }
    }

    async fn list(&self) -> Result<Vec<PlayerCharacter>, RepoError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| RepoError::database("list", e))?;

        let mut characters = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepoError::database("list", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match self.read(&path).await {
                Ok(Some(character)) => characters.push(character),
                Ok(None) => {}
                Err(RepoError::Serialization(message)) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %message,
                        "Skipping unreadable character sheet"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        characters.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(characters)
    }
}
