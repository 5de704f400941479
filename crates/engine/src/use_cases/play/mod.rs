//! Play use cases.
//!
//! Everything a character does at the table outside of rolling dice: marks,
//! conditions, damage and healing, abilities and spells, rests. Each operation
//! loads the sheet, applies one domain mutation and saves the new snapshot.

use std::sync::Arc;

use serde::Serialize;
use sheetsmith_domain::{
    CharacterId, Condition, ConditionToggled, DamageOutcome, DerivedStats, DomainError,
    HealOutcome, PlayerCharacter, PowerUsed, RestOutcome, RestTier, SkillMarkOutcome,
};

use super::error::CharacterError;
use super::sheet::{self, SheetUpdate};
use crate::infrastructure::persistence::decode_sheet;
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RandomPort};
use crate::stores::RollSessionStore;

/// A sheet with its derived statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetView {
    pub character: PlayerCharacter,
    pub derived: DerivedStats,
    pub level: u32,
}

/// Container for play use cases.
pub struct PlayUseCases {
    repo: Arc<dyn CharacterRepo>,
    sessions: Arc<RollSessionStore>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl PlayUseCases {
    pub fn new(
        repo: Arc<dyn CharacterRepo>,
        sessions: Arc<RollSessionStore>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            repo,
            sessions,
            clock,
            random,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn view(&self, id: CharacterId) -> Result<SheetView, CharacterError> {
        let character = sheet::load(self.repo.as_ref(), id).await?;
        let derived = character.derived();
        let level = character.level();
        tracing::debug!(
            character_id = %id,
            movement = derived.movement,
            max_hp = derived.max_hp,
            max_wp = derived.max_wp,
            level,
            "Derived sheet"
        );
        Ok(SheetView {
            character,
            derived,
            level,
        })
    }

    pub async fn list(&self) -> Result<Vec<PlayerCharacter>, CharacterError> {
        Ok(self.repo.list().await?)
    }

    /// Store a sheet from JSON, replacing any stored copy of the same character.
    ///
    /// Legacy free-text gear effects are migrated on the way in.
    pub async fn import(&self, json: &str) -> Result<PlayerCharacter, CharacterError> {
        let character = decode_sheet(json)?;
        let id = character.id();
        let stored_version = self
            .repo
            .get(id)
            .await?
            .map(|stored| stored.version())
            .unwrap_or(0);

        let update = sheet::save(
            self.repo.as_ref(),
            character.with_version(stored_version),
            (),
        )
        .await?;
        tracing::info!(
            character_id = %id,
            replaced = stored_version > 0,
            "Imported character"
        );
        Ok(update.character)
    }

    /// Delete a character and its roll session.
    pub async fn delete(&self, id: CharacterId) -> Result<(), CharacterError> {
        self.repo.delete(id).await.map_err(|e| {
            if e.is_not_found() {
                CharacterError::CharacterNotFound(id)
            } else {
                CharacterError::Repo(e)
            }
        })?;
        self.sessions.remove(id);
        tracing::info!(character_id = %id, "Deleted character");
        Ok(())
    }

    // =========================================================================
    // Experience and conditions
    // =========================================================================

    pub async fn mark_skill(
        &self,
        id: CharacterId,
        skill: &str,
    ) -> Result<SheetUpdate<SkillMarkOutcome>, CharacterError> {
        let mut character = sheet::load(self.repo.as_ref(), id).await?;
        let outcome = character.mark_skill(skill, self.clock.now())?;
        match &outcome {
            SkillMarkOutcome::Marked { skill, level } => {
                tracing::info!(character_id = %id, skill = %skill, level, "Marked skill");
            }
            SkillMarkOutcome::AlreadyMarked { .. } => {
                return Ok(SheetUpdate { character, outcome });
            }
        }
        sheet::save(self.repo.as_ref(), character, outcome).await
    }

    pub async fn toggle_condition(
        &self,
        id: CharacterId,
        condition: Condition,
    ) -> Result<SheetUpdate<ConditionToggled>, CharacterError> {
        let mut character = sheet::load(self.repo.as_ref(), id).await?;
        let outcome = character.toggle_condition(condition, self.clock.now());
        tracing::info!(
            character_id = %id,
            condition = %outcome.condition,
            active = outcome.active,
            "Toggled condition"
        );
        sheet::save(self.repo.as_ref(), character, outcome).await
    }

    pub async fn clear_conditions(
        &self,
        id: CharacterId,
    ) -> Result<SheetUpdate<()>, CharacterError> {
        let mut character = sheet::load(self.repo.as_ref(), id).await?;
        character.clear_conditions(self.clock.now());
        tracing::info!(character_id = %id, "Cleared all conditions");
        sheet::save(self.repo.as_ref(), character, ()).await
    }

    // =========================================================================
    // Hit points and willpower
    // =========================================================================

    pub async fn apply_damage(
        &self,
        id: CharacterId,
        amount: i32,
    ) -> Result<SheetUpdate<DamageOutcome>, CharacterError> {
        non_negative("Damage", amount)?;
        let mut character = sheet::load(self.repo.as_ref(), id).await?;
        let outcome = character.apply_damage(amount, self.clock.now());
        tracing::info!(
            character_id = %id,
            amount,
            hp = character.hp().current(),
            "Applied damage"
        );
        sheet::save(self.repo.as_ref(), character, outcome).await
    }

    pub async fn heal(
        &self,
        id: CharacterId,
        amount: i32,
    ) -> Result<SheetUpdate<HealOutcome>, CharacterError> {
        non_negative("Healing", amount)?;
        let mut character = sheet::load(self.repo.as_ref(), id).await?;
        let outcome = character.heal(amount, self.clock.now());
        tracing::info!(
            character_id = %id,
            amount,
            hp = character.hp().current(),
            "Healed"
        );
        sheet::save(self.repo.as_ref(), character, outcome).await
    }

    pub async fn use_ability(
        &self,
        id: CharacterId,
        ability: &str,
    ) -> Result<SheetUpdate<PowerUsed>, CharacterError> {
        let mut character = sheet::load(self.repo.as_ref(), id).await?;
        let outcome = character.use_ability(ability, self.clock.now())?;
        tracing::info!(
            character_id = %id,
            ability = %outcome.name,
            wp_spent = outcome.wp_spent,
            "Used ability"
        );
        sheet::save(self.repo.as_ref(), character, outcome).await
    }

    pub async fn cast_spell(
        &self,
        id: CharacterId,
        spell: &str,
        power_level: u8,
    ) -> Result<SheetUpdate<PowerUsed>, CharacterError> {
        let mut character = sheet::load(self.repo.as_ref(), id).await?;
        let outcome = character.cast_spell(spell, power_level, self.clock.now())?;
        tracing::info!(
            character_id = %id,
            spell = %outcome.name,
            power_level,
            wp_spent = outcome.wp_spent,
            "Cast spell"
        );
        sheet::save(self.repo.as_ref(), character, outcome).await
    }

    pub async fn rest(
        &self,
        id: CharacterId,
        tier: RestTier,
        healer_present: bool,
    ) -> Result<SheetUpdate<RestOutcome>, CharacterError> {
        let mut character = sheet::load(self.repo.as_ref(), id).await?;
        let mut roll = |size: u8| self.random.roll_die(size);
        let outcome = character.rest(tier, healer_present, &mut roll, self.clock.now());
        tracing::info!(
            character_id = %id,
            tier = %tier,
            hp_recovered = outcome.hp_recovered,
            wp_recovered = outcome.wp_recovered,
            "Rested"
        );
        sheet::save(self.repo.as_ref(), character, outcome).await
    }
}

fn non_negative(what: &str, amount: i32) -> Result<(), DomainError> {
    if amount < 0 {
        return Err(DomainError::validation(format!(
            "{} cannot be negative, got {}",
            what, amount
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, ScriptedRandom};
    use crate::infrastructure::persistence::InMemoryCharacterRepo;
    use crate::infrastructure::ports::{MockCharacterRepo, MockClockPort, RepoError};
    use chrono::{TimeZone, Utc};
    use sheetsmith_domain::{
        AgeCategory, Attributes, CharacterName, Kin, MagicSchool, Profession, RollModifier, Spell,
    };

    fn fixed_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
    }

    fn fighter() -> PlayerCharacter {
        PlayerCharacter::new(
            CharacterName::new("Ragna").unwrap(),
            Kin::Human,
            AgeCategory::Adult,
            Profession::Fighter,
            None,
            Attributes::new(15, 12, 13, 10, 10, 9),
            fixed_now(),
        )
        .unwrap()
    }

    fn mage() -> PlayerCharacter {
        PlayerCharacter::new(
            CharacterName::new("Ilse").unwrap(),
            Kin::Elf,
            AgeCategory::Adult,
            Profession::Mage,
            Some(MagicSchool::Elementalism),
            Attributes::new(8, 10, 12, 15, 14, 11),
            fixed_now(),
        )
        .unwrap()
        .with_spell(Spell::new("Fireball", 1))
    }

    async fn seeded(pc: &PlayerCharacter) -> Arc<InMemoryCharacterRepo> {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let mut pc = pc.clone();
        let expected = pc.bump_version();
        repo.save(&pc, expected).await.unwrap();
        repo
    }

    fn use_cases(repo: Arc<dyn CharacterRepo>, dice: Vec<i32>) -> PlayUseCases {
        PlayUseCases::new(
            repo,
            Arc::new(RollSessionStore::new(20)),
            Arc::new(FixedClock(fixed_now())),
            Arc::new(ScriptedRandom::new(dice)),
        )
    }

    mod with_mocks {
        use super::*;

        #[tokio::test]
        async fn when_character_missing_returns_not_found() {
            let id = CharacterId::new();
            let mut repo = MockCharacterRepo::new();
            repo.expect_get()
                .withf(move |requested| *requested == id)
                .returning(|_| Ok(None));
            repo.expect_save().never();

            let play = PlayUseCases::new(
                Arc::new(repo),
                Arc::new(RollSessionStore::new(20)),
                Arc::new(MockClockPort::new()),
                Arc::new(ScriptedRandom::new([1])),
            );
            let result = play.apply_damage(id, 3).await;
            assert!(matches!(
                result,
                Err(CharacterError::CharacterNotFound(missing)) if missing == id
            ));
        }

        #[tokio::test]
        async fn saves_with_loaded_version() {
            let mut stored = fighter();
            stored.bump_version();
            let id = stored.id();

            let mut repo = MockCharacterRepo::new();
            let snapshot = stored.clone();
            repo.expect_get()
                .returning(move |_| Ok(Some(snapshot.clone())));
            repo.expect_save()
                .withf(|pc, expected| *expected == 1 && pc.version() == 2 && pc.hp().current() == 7)
                .times(1)
                .returning(|_, _| Ok(()));

            let mut clock = MockClockPort::new();
            clock.expect_now().returning(fixed_now);

            let play = PlayUseCases::new(
                Arc::new(repo),
                Arc::new(RollSessionStore::new(20)),
                Arc::new(clock),
                Arc::new(ScriptedRandom::new([1])),
            );
            let update = play.apply_damage(id, 5).await.unwrap();
            assert_eq!(
                update.outcome,
                DamageOutcome::Wounded {
                    damage_dealt: 5,
                    remaining_hp: 7
                }
            );
        }

        #[tokio::test]
        async fn version_conflict_is_reported() {
            let stored = fighter();
            let id = stored.id();

            let mut repo = MockCharacterRepo::new();
            repo.expect_get()
                .returning(move |_| Ok(Some(stored.clone())));
            repo.expect_save()
                .returning(move |_, expected| Err(RepoError::version_conflict(id, expected, 4)));

            let play = use_cases(Arc::new(repo), vec![1]);
            let err = play
                .toggle_condition(id, Condition::Angry)
                .await
                .unwrap_err();
            assert!(err.is_conflict());
        }

        #[tokio::test]
        async fn marking_a_marked_skill_does_not_save() {
            let mut stored = fighter();
            stored.mark_skill("Swords", Utc::now()).unwrap();
            let id = stored.id();
            let version = stored.version();

            let mut repo = MockCharacterRepo::new();
            repo.expect_get()
                .returning(move |_| Ok(Some(stored.clone())));
            repo.expect_save().never();

            let play = use_cases(Arc::new(repo), vec![1]);
            let update = play.mark_skill(id, "swords").await.unwrap();
            assert!(matches!(update.outcome, SkillMarkOutcome::AlreadyMarked { .. }));
            assert_eq!(update.character.version(), version);
        }

        #[tokio::test]
        async fn negative_damage_is_rejected_before_loading() {
            let mut repo = MockCharacterRepo::new();
            repo.expect_get().never();
            let play = use_cases(Arc::new(repo), vec![1]);
            let err = play.apply_damage(CharacterId::new(), -2).await.unwrap_err();
            assert!(matches!(err, CharacterError::Domain(DomainError::Validation(_))));
        }
    }

    mod against_memory_repo {
        use super::*;

        #[tokio::test]
        async fn damage_then_heal_stays_in_bounds() {
            let pc = fighter();
            let repo = seeded(&pc).await;
            let play = use_cases(repo.clone(), vec![1]);

            let downed = play.apply_damage(pc.id(), 50).await.unwrap();
            assert_eq!(downed.outcome, DamageOutcome::Downed { damage_dealt: 12 });
            assert_eq!(downed.character.hp().current(), 0);

            let again = play.apply_damage(pc.id(), 1).await.unwrap();
            assert_eq!(again.outcome, DamageOutcome::AlreadyDown);

            let healed = play.heal(pc.id(), 40).await.unwrap();
            assert_eq!(healed.character.hp().current(), 12);
            assert_eq!(healed.character.version(), 4);
        }

        #[tokio::test]
        async fn toggling_twice_restores_condition() {
            let pc = fighter();
            let repo = seeded(&pc).await;
            let play = use_cases(repo, vec![1]);

            let on = play.toggle_condition(pc.id(), Condition::Dazed).await.unwrap();
            assert!(on.outcome.active);
            let off = play.toggle_condition(pc.id(), Condition::Dazed).await.unwrap();
            assert!(!off.outcome.active);
            assert!(!off.character.conditions().any_active());
        }

        #[tokio::test]
        async fn marks_raise_level_once_per_skill() {
            let pc = fighter();
            let repo = seeded(&pc).await;
            let play = use_cases(repo, vec![1]);

            play.mark_skill(pc.id(), "Swords").await.unwrap();
            let twice = play.mark_skill(pc.id(), "swords").await.unwrap();
            assert!(matches!(twice.outcome, SkillMarkOutcome::AlreadyMarked { .. }));
            assert_eq!(play.view(pc.id()).await.unwrap().level, 1);

            let err = play.mark_skill(pc.id(), "Basket Weaving").await.unwrap_err();
            assert!(matches!(
                err,
                CharacterError::Domain(DomainError::NotFound { kind: "skill", .. })
            ));
        }

        #[tokio::test]
        async fn spells_spend_willpower_and_shift_rest_restores_it() {
            let pc = mage();
            let repo = seeded(&pc).await;
            let play = use_cases(repo, vec![4]);

            let cast = play.cast_spell(pc.id(), "fireball", 3).await.unwrap();
            assert_eq!(cast.outcome.wp_spent, 6);
            assert_eq!(cast.outcome.remaining_wp, 8);

            play.cast_spell(pc.id(), "Fireball", 3).await.unwrap();
            let broke = play.cast_spell(pc.id(), "Fireball", 3).await.unwrap_err();
            assert!(matches!(
                broke,
                CharacterError::Domain(DomainError::InsufficientResource {
                    required: 6,
                    available: 2,
                    ..
                })
            ));

            play.toggle_condition(pc.id(), Condition::Scared).await.unwrap();
            let rested = play.rest(pc.id(), RestTier::Shift, false).await.unwrap();
            assert!(rested.outcome.conditions_cleared);
            assert!(rested.character.wp().is_full());
            assert!(rested.character.hp().is_full());
            assert!(!rested.character.conditions().any_active());
        }

        #[tokio::test]
        async fn round_rest_rolls_a_d6_for_willpower() {
            let pc = mage();
            let repo = seeded(&pc).await;
            let play = use_cases(repo, vec![5]);

            play.cast_spell(pc.id(), "Fireball", 3).await.unwrap();
            let rested = play.rest(pc.id(), RestTier::Round, false).await.unwrap();
            assert_eq!(rested.outcome.rolled, vec![5]);
            assert_eq!(rested.outcome.wp_recovered, 5);
            assert_eq!(rested.character.wp().current(), 13);
        }

        #[tokio::test]
        async fn fighters_cannot_cast() {
            let pc = fighter();
            let repo = seeded(&pc).await;
            let play = use_cases(repo, vec![1]);
            let err = play.cast_spell(pc.id(), "Fireball", 1).await.unwrap_err();
            assert!(matches!(
                err,
                CharacterError::Domain(DomainError::InvalidStateTransition(_))
            ));
        }

        #[tokio::test]
        async fn import_replaces_stored_copy_and_migrates_gear() {
            let pc = fighter();
            let repo = seeded(&pc).await;
            let play = use_cases(repo, vec![1]);
            play.apply_damage(pc.id(), 4).await.unwrap();

            let mut document = serde_json::to_value(&pc).unwrap();
            document["gear"] = serde_json::json!([
                {"source": "Plate armor", "effect": "Bane on Evade"}
            ]);
            let imported = play.import(&document.to_string()).await.unwrap();
            assert_eq!(imported.version(), 3);
            assert!(imported.hp().is_full());

            let check = play
                .view(pc.id())
                .await
                .unwrap()
                .character
                .prepare_check("Evade", RollModifier::None)
                .unwrap();
            assert_eq!(check.modifier, RollModifier::Bane);
        }

        #[tokio::test]
        async fn delete_removes_sheet() {
            let pc = fighter();
            let repo = seeded(&pc).await;
            let play = use_cases(repo, vec![1]);
            play.delete(pc.id()).await.unwrap();
            assert!(matches!(
                play.view(pc.id()).await,
                Err(CharacterError::CharacterNotFound(_))
            ));
            assert!(matches!(
                play.delete(pc.id()).await,
                Err(CharacterError::CharacterNotFound(_))
            ));
        }
    }
}
