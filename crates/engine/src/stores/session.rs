//! Per-character roll sessions.
//!
//! Roll history is session state, not part of the sheet: it lives here and is
//! never persisted. Each character gets its own `DiceEngine`, and the skill of
//! the newest roll is remembered so a push can report which skill it was for.

use dashmap::DashMap;
use sheetsmith_domain::{CharacterId, DiceEngine, DiceRoll};

/// Roll state of one character.
#[derive(Debug, Clone)]
pub struct RollSession {
    pub dice: DiceEngine,
    /// Skill of the newest roll, if it was a skill check.
    pub skill: Option<&'static str>,
}

impl RollSession {
    fn new(capacity: usize) -> Self {
        Self {
            dice: DiceEngine::new(capacity),
            skill: None,
        }
    }
}

/// All live roll sessions, keyed by character.
pub struct RollSessionStore {
    sessions: DashMap<CharacterId, RollSession>,
    capacity: usize,
}

impl RollSessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            capacity,
        }
    }

    /// Run `f` against the character's session, creating it on first use.
    ///
    /// The session's shard stays locked for the duration of `f`, so rolls for
    /// one character never interleave.
    pub fn with_session<T>(&self, id: CharacterId, f: impl FnOnce(&mut RollSession) -> T) -> T {
        let mut session = self
            .sessions
            .entry(id)
            .or_insert_with(|| RollSession::new(self.capacity));
        f(session.value_mut())
    }

    /// Newest-first copy of a character's roll history.
    pub fn history(&self, id: CharacterId) -> Vec<DiceRoll> {
        self.sessions
            .get(&id)
            .map(|session| session.dice.history().cloned().collect())
            .unwrap_or_default()
    }

    pub fn can_push(&self, id: CharacterId) -> bool {
        self.sessions
            .get(&id)
            .is_some_and(|session| session.dice.can_push())
    }

    /// Forget the character's rolls and push context.
    pub fn clear(&self, id: CharacterId) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.dice.clear();
            session.skill = None;
        }
    }

    /// Drop the session entirely (e.g. when the character is deleted).
    pub fn remove(&self, id: CharacterId) {
        self.sessions.remove(&id);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
