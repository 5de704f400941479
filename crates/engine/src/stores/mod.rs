//! In-process stores for state that is not persisted.

pub mod session;

pub use session::{RollSession, RollSessionStore};
