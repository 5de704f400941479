//! Dice resolution and the per-session push protocol.
//!
//! All randomness comes from a caller-supplied `roll` closure: given a die
//! size it returns a value in `1..=size`.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::error::DomainError;
use crate::value_objects::{
    CheckOutcome, DiceRoll, DiceSpec, DieResult, RollModifier, D20,
};

/// Default number of rolls kept per session.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Roll every die in `spec`, in composition order.
pub fn roll_group<R>(spec: &DiceSpec, roll: &mut R) -> (Vec<DieResult>, u32)
where
    R: FnMut(u8) -> u8,
{
    let mut results = Vec::with_capacity(spec.die_count());
    for group in spec.groups() {
        for _ in 0..group.count {
            results.push(DieResult {
                size: group.size,
                value: roll(group.size),
            });
        }
    }
    let total = results.iter().map(|r| u32::from(r.value)).sum();
    (results, total)
}

/// Roll `spec` and resolve it as a skill check when it has exactly one d20
/// and a skill value is given.
///
/// Under boon or bane the first d20 is drawn twice and the kept draw is
/// placed in `results`; other dice are rolled once. A roll without a d20
/// never carries a modifier.
pub fn resolve_check<R>(
    spec: &DiceSpec,
    skill_value: Option<u8>,
    modifier: RollModifier,
    pushed: bool,
    roll: &mut R,
    now: DateTime<Utc>,
) -> DiceRoll
where
    R: FnMut(u8) -> u8,
{
    let modifier = if spec.contains_d20() {
        modifier
    } else {
        RollModifier::None
    };

    let mut results = Vec::with_capacity(spec.die_count());
    let mut discarded = None;
    for group in spec.groups() {
        for _ in 0..group.count {
            let draws_twice =
                group.size == D20 && discarded.is_none() && modifier != RollModifier::None;
            let value = if draws_twice {
                let first = roll(D20);
                let second = roll(D20);
                let (kept, dropped) = modifier.select(first, second);
                discarded = Some(dropped);
                kept
            } else {
                roll(group.size)
            };
            results.push(DieResult {
                size: group.size,
                value,
            });
        }
    }

    let total = results.iter().map(|r| u32::from(r.value)).sum();
    let skill_value = skill_value.filter(|_| spec.is_single_d20());
    let outcome = skill_value.and_then(|skill| {
        results
            .iter()
            .find(|r| r.size == D20)
            .map(|d20| CheckOutcome::resolve(d20.value, skill))
    });

    DiceRoll {
        dice: spec.clone(),
        results,
        total,
        skill_value,
        outcome,
        modifier,
        discarded,
        pushed,
        rolled_at: now,
    }
}

/// Per-session roll history and push state.
///
/// # Invariants
///
/// - `can_push()` is true iff the newest roll was not pushed and had a d20.
/// - History holds at most `capacity` rolls, newest first.
#[derive(Debug, Clone)]
pub struct DiceEngine {
    history: VecDeque<DiceRoll>,
    capacity: usize,
}

impl Default for DiceEngine {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl DiceEngine {
    /// A capacity below 1 is raised to 1 so the last roll can be pushed.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Make a fresh (unpushed) roll.
    pub fn roll<R>(
        &mut self,
        spec: &DiceSpec,
        skill_value: Option<u8>,
        modifier: RollModifier,
        roll: &mut R,
        now: DateTime<Utc>,
    ) -> DiceRoll
    where
        R: FnMut(u8) -> u8,
    {
        let result = resolve_check(spec, skill_value, modifier, false, roll, now);
        self.record(result.clone());
        result
    }

    pub fn can_push(&self) -> bool {
        self.history
            .front()
            .is_some_and(|last| !last.pushed && last.contains_d20())
    }

    /// Re-roll the newest roll with the same dice, skill value and modifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` when the newest roll
    /// cannot be pushed. Nothing is rolled and the history is unchanged.
    pub fn push<R>(&mut self, roll: &mut R, now: DateTime<Utc>) -> Result<DiceRoll, DomainError>
    where
        R: FnMut(u8) -> u8,
    {
        let last = match self.history.front() {
            Some(last) if !last.pushed && last.contains_d20() => last,
            Some(last) if last.pushed => {
                return Err(DomainError::invalid_state_transition(
                    "A roll can only be pushed once",
                ))
            }
            Some(_) => {
                return Err(DomainError::invalid_state_transition(
                    "Only rolls with a d20 can be pushed",
                ))
            }
            None => {
                return Err(DomainError::invalid_state_transition("There is no roll to push"))
            }
        };

        let result = resolve_check(
            &last.dice,
            last.skill_value,
            last.modifier,
            true,
            roll,
            now,
        );
        self.record(result.clone());
        Ok(result)
    }

    /// Forget all rolls and the push context.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Rolls, newest first.
    pub fn history(&self) -> impl Iterator<Item = &DiceRoll> {
        self.history.iter()
    }

    pub fn last(&self) -> Option<&DiceRoll> {
        self.history.front()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn record(&mut self, roll: DiceRoll) {
        self.history.push_front(roll);
        self.history.truncate(self.capacity);
    }
}
