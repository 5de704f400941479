//! Dice use cases: skill checks, free rolls and pushes.
//!
//! Rolling never changes the sheet. A Dragon or Demon on a skill check only
//! suggests a mark; the caller decides whether to call `mark_skill`. Likewise
//! taking a condition for a push is left to the caller.

use std::sync::Arc;

use serde::Serialize;
use sheetsmith_domain::{CharacterId, DiceRoll, DiceSpec, RollModifier, SkillCheck};

use super::error::CharacterError;
use super::sheet;
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RandomPort};
use crate::stores::RollSessionStore;

/// Result of a skill check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub check: SkillCheck,
    pub roll: DiceRoll,
    /// Dragon or Demon: the skill may be marked.
    pub mark_suggested: bool,
    pub can_push: bool,
}

/// Result of pushing the newest roll.
#[derive(Debug, Clone, Serialize)]
pub struct PushResult {
    pub roll: DiceRoll,
    /// Skill the pushed roll was for, if it was a skill check.
    pub skill: Option<&'static str>,
    pub mark_suggested: bool,
}

/// Container for dice use cases.
pub struct DiceUseCases {
    repo: Arc<dyn CharacterRepo>,
    sessions: Arc<RollSessionStore>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl DiceUseCases {
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

    /// Roll a d20 against one of the character's skills.
    ///
    /// Active conditions and gear effects may force a bane regardless of
    /// `requested`.
    pub async fn roll_check(
        &self,
        id: CharacterId,
        skill: &str,
        requested: RollModifier,
    ) -> Result<CheckResult, CharacterError> {
        let character = sheet::load(self.repo.as_ref(), id).await?;
        let check = character.prepare_check(skill, requested)?;
        let now = self.clock.now();

        let (roll, can_push) = self.sessions.with_session(id, |session| {
            let mut die = |size: u8| self.random.roll_die(size);
            let roll = session
                .dice
                .roll(&DiceSpec::d20(), Some(check.value), check.modifier, &mut die, now);
            session.skill = Some(check.skill.name);
            (roll, session.dice.can_push())
        });

        tracing::info!(
            character_id = %id,
            skill = check.skill.name,
            skill_value = check.value,
            modifier = ?check.modifier,
            forced_bane = check.context.forced_bane,
            result = %roll.breakdown(),
            "Rolled skill check"
        );

        Ok(CheckResult {
            mark_suggested: roll.triggers_mark(),
            check,
            roll,
            can_push,
        })
    }

    /// Roll any dice formula, optionally against a bare target value.
    pub async fn roll_formula(
        &self,
        id: CharacterId,
        formula: &str,
        target: Option<u8>,
        modifier: RollModifier,
    ) -> Result<DiceRoll, CharacterError> {
        let spec = DiceSpec::parse(formula).map_err(sheetsmith_domain::DomainError::from)?;
        sheet::load(self.repo.as_ref(), id).await?;
        let now = self.clock.now();

        let roll = self.sessions.with_session(id, |session| {
            let mut die = |size: u8| self.random.roll_die(size);
            let roll = session.dice.roll(&spec, target, modifier, &mut die, now);
            session.skill = None;
            roll
        });

        tracing::info!(
            character_id = %id,
            dice = %spec,
            total = roll.total,
            result = %roll.breakdown(),
            "Rolled dice"
        );
        Ok(roll)
    }

    /// Re-roll the newest roll once.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidStateTransition` when the newest roll was already
    /// a push, had no d20, or there is no roll. Nothing is rolled then.
    pub async fn push(&self, id: CharacterId) -> Result<PushResult, CharacterError> {
        let now = self.clock.now();
        let result = self.sessions.with_session(id, |session| {
            let mut die = |size: u8| self.random.roll_die(size);
            session.dice.push(&mut die, now).map(|roll| PushResult {
                mark_suggested: roll.triggers_mark() && session.skill.is_some(),
                skill: session.skill,
                roll,
            })
        });

        match &result {
            Ok(pushed) => tracing::info!(
                character_id = %id,
                skill = pushed.skill.unwrap_or("-"),
                result = %pushed.roll.breakdown(),
                "Pushed roll"
            ),
            Err(e) => tracing::debug!(character_id = %id, error = %e, "Push rejected"),
        }
        result.map_err(CharacterError::from)
    }

    pub fn can_push(&self, id: CharacterId) -> bool {
        self.sessions.can_push(id)
    }

    /// Newest-first roll history of the session.
    pub fn history(&self, id: CharacterId) -> Vec<DiceRoll> {
        self.sessions.history(id)
    }

    pub fn clear(&self, id: CharacterId) {
        self.sessions.clear(id);
        tracing::debug!(character_id = %id, "Cleared roll history");
    }
}
