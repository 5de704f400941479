//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::{SeededRandom, SystemClock, SystemRandom},
    persistence::{InMemoryCharacterRepo, JsonDirCharacterRepo},
    ports::{CharacterRepo, ClockPort, RandomPort, RepoError},
    settings::EngineSettings,
};
use crate::stores::RollSessionStore;
use crate::use_cases;

/// Main application state.
///
/// Holds the repository, the session stores and all use cases.
pub struct App {
    pub repositories: Repositories,
    pub stores: Stores,
    pub use_cases: UseCases,
    pub settings: EngineSettings,
}

/// Container for repository ports.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
}

/// Container for in-process state.
pub struct Stores {
    pub rolls: Arc<RollSessionStore>,
}

/// Container for all use cases.
pub struct UseCases {
    pub creation: use_cases::CreationUseCases,
    pub play: use_cases::PlayUseCases,
    pub dice: use_cases::DiceUseCases,
    pub advancement: use_cases::AdvancementUseCases,
}

impl App {
    /// Build an app from settings: JSON files when a data directory is set,
    /// memory otherwise; seeded dice when a seed is set.
    pub async fn from_settings(settings: EngineSettings) -> Result<Self, RepoError> {
        let repo: Arc<dyn CharacterRepo> = match &settings.data_dir {
            Some(dir) => Arc::new(JsonDirCharacterRepo::open(dir.clone()).await?),
            None => {
                tracing::info!("No data directory configured, characters are kept in memory");
                Arc::new(InMemoryCharacterRepo::new())
            }
        };
        let random: Arc<dyn RandomPort> = match settings.rng_seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded dice");
                Arc::new(SeededRandom::new(seed))
            }
            None => Arc::new(SystemRandom::new()),
        };
        Ok(Self::new(repo, Arc::new(SystemClock::new()), random, settings))
    }

    /// Create a new App with all dependencies wired up.
    pub fn new(
        character_repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        settings: EngineSettings,
    ) -> Self {
        let rolls = Arc::new(RollSessionStore::new(settings.roll_history));

        let use_cases = UseCases {
            creation: use_cases::CreationUseCases::new(
                character_repo.clone(),
                clock.clone(),
                random.clone(),
            ),
            play: use_cases::PlayUseCases::new(
                character_repo.clone(),
                rolls.clone(),
                clock.clone(),
                random.clone(),
            ),
            dice: use_cases::DiceUseCases::new(
                character_repo.clone(),
                rolls.clone(),
                clock.clone(),
                random,
            ),
            advancement: use_cases::AdvancementUseCases::new(character_repo.clone(), clock),
        };

        Self {
            repositories: Repositories {
                character: character_repo,
            },
            stores: Stores { rolls },
            use_cases,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::CharacterError;
    use sheetsmith_domain::{
        AgeCategory, Attributes, CharacterId, CheckOutcome, CreationField, Kin, Profession,
        RollModifier,
    };

    async fn seeded_app(seed: u64) -> App {
        let settings = EngineSettings {
            rng_seed: Some(seed),
            roll_history: 3,
            ..EngineSettings::default()
        };
        App::from_settings(settings).await.unwrap()
    }

    #[tokio::test]
    async fn create_roll_and_mark_end_to_end() {
        let app = seeded_app(7).await;
        let creation = &app.use_cases.creation;

        let draft_id = creation.start().draft_id;
        for field in [
            CreationField::Name("Gunnhild".to_string()),
            CreationField::Kin(Kin::Dwarf),
            CreationField::Age(AgeCategory::Adult),
            CreationField::Profession(Profession::Fighter),
            CreationField::Attributes(Attributes::new(16, 14, 10, 9, 11, 8)),
            CreationField::TrainSkill("Axes".to_string()),
        ] {
            creation.update_field(draft_id, field).unwrap();
        }
        let pc = creation.commit(draft_id).await.unwrap();

        // Roll until a Dragon or Demon shows up, then mark it
        let dice = &app.use_cases.dice;
        let mut marked = false;
        for _ in 0..400 {
            let result = dice
                .roll_check(pc.id(), "Axes", RollModifier::None)
                .await
                .unwrap();
            assert_eq!(result.check.value, 14);
            if matches!(
                result.roll.outcome,
                Some(CheckOutcome::Dragon) | Some(CheckOutcome::Demon)
            ) {
                assert!(result.mark_suggested);
                app.use_cases.play.mark_skill(pc.id(), "Axes").await.unwrap();
                marked = true;
                break;
            }
        }
        assert!(marked);
        assert!(dice.history(pc.id()).len() <= 3);

        let view = app.use_cases.play.view(pc.id()).await.unwrap();
        assert_eq!(view.level, 1);
        assert_eq!(view.derived.max_hp, 14);
        assert!(app
            .use_cases
            .advancement
            .available(pc.id())
            .await
            .unwrap()
            .available
            .is_empty());
    }

    #[tokio::test]
    async fn same_seed_gives_same_rolls() {
        let mut totals = Vec::new();
        for _ in 0..2 {
            let app = seeded_app(99).await;
            let creation = &app.use_cases.creation;
            let draft_id = creation.start().draft_id;
            let (_, rolls) = creation.roll_attributes(draft_id).unwrap();
            totals.push(rolls.iter().map(|r| r.total).collect::<Vec<_>>());
        }
        assert_eq!(totals[0], totals[1]);
    }

    #[tokio::test]
    async fn unknown_character_is_not_found() {
        let app = seeded_app(1).await;
        let err = app
            .use_cases
            .play
            .view(CharacterId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CharacterError::CharacterNotFound(_)));
    }
}
