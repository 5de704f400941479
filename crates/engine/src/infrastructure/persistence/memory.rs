//! In-memory character storage.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sheetsmith_domain::{CharacterId, PlayerCharacter};

use super::{decode_sheet, encode_sheet};
use crate::infrastructure::ports::{CharacterRepo, RepoError};

struct StoredSheet {
    version: u64,
    json: String,
}

/// Sheets kept as JSON in a concurrent map, keyed by character.
#[derive(Default)]
pub struct InMemoryCharacterRepo {
    sheets: DashMap<CharacterId, StoredSheet>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<PlayerCharacter>, RepoError> {
        // Copy the document out so no shard lock is held while decoding
        let json = match self.sheets.get(&id) {
            Some(stored) => stored.json.clone(),
            None => return Ok(None),
        };
        decode_sheet(&json).map(Some)
    }

    async fn save(
        &self,
        character: &PlayerCharacter,
        expected_version: u64,
    ) -> Result<(), RepoError> {
        let json = encode_sheet(character)?;
        let stored = StoredSheet {
            version: character.version(),
            json,
        };

        match self.sheets.entry(character.id()) {
            Entry::Occupied(mut entry) => {
                let found = entry.get().version;
                if found != expected_version {
                    return Err(RepoError::version_conflict(
                        character.id(),
                        expected_version,
                        found,
                    ));
                }
                entry.insert(stored);
            }
            Entry::Vacant(entry) => {
                if expected_version != 0 {
                    return Err(RepoError::version_conflict(
                        character.id(),
                        expected_version,
                        0,
                    ));
                }
                entry.insert(stored);
            }
        }
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        self.sheets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Character", id))
    }

    async fn list(&self) -> Result<Vec<PlayerCharacter>, RepoError> {
        let documents: Vec<String> = self
            .sheets
            .iter()
            .map(|entry| entry.value().json.clone())
            .collect();
        let mut characters = documents
            .iter()
            .map(|json| decode_sheet(json))
            .collect::<Result<Vec<_>, _>>()?;
        characters.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(characters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sheetsmith_domain::{AgeCategory, Attributes, CharacterName, Kin, Profession};

    fn character(name: &str) -> PlayerCharacter {
        PlayerCharacter::new(
            CharacterName::new(name).unwrap(),
            Kin::Human,
            AgeCategory::Adult,
            Profession::Fighter,
            None,
            Attributes::uniform(12),
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn first_save_expects_version_zero() {
        let repo = InMemoryCharacterRepo::new();
        let mut pc = character("Aldo");
        let expected = pc.bump_version();
        repo.save(&pc, expected).await.unwrap();

        let loaded = repo.get(pc.id()).await.unwrap().unwrap();
        assert_eq!(loaded, pc);
        assert_eq!(loaded.version(), 1);
    }

    #[tokio::test]
    async fn stale_save_is_rejected_and_nothing_is_written() {
        let repo = InMemoryCharacterRepo::new();
        let mut pc = character("Aldo");
        let expected = pc.bump_version();
        repo.save(&pc, expected).await.unwrap();

        // Two tabs load version 1
        let mut tab_a = repo.get(pc.id()).await.unwrap().unwrap();
        let mut tab_b = tab_a.clone();

        tab_a.apply_damage(3, Utc::now());
        let expected = tab_a.bump_version();
        repo.save(&tab_a, expected).await.unwrap();

        tab_b.heal(1, Utc::now());
        let expected = tab_b.bump_version();
        let err = repo.save(&tab_b, expected).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::VersionConflict {
                expected: 1,
                found: 2,
                ..
            }
        ));

        let stored = repo.get(pc.id()).await.unwrap().unwrap();
        assert_eq!(stored.hp().current(), 9);
    }

    #[tokio::test]
    async fn saving_unknown_sheet_with_nonzero_version_conflicts() {
        let repo = InMemoryCharacterRepo::new();
        let mut pc = character("Aldo");
        pc.bump_version();
        let expected = pc.bump_version();
        let err = repo.save(&pc, expected).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn delete_and_list() {
        let repo = InMemoryCharacterRepo::new();
        for name in ["Vera", "Bo"] {
            let mut pc = character(name);
            let expected = pc.bump_version();
            repo.save(&pc, expected).await.unwrap();
        }
        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|pc| pc.name().to_string())
            .collect();
        assert_eq!(names, vec!["Bo", "Vera"]);

        let missing = CharacterId::new();
        assert!(repo.delete(missing).await.unwrap_err().is_not_found());
    }
}
