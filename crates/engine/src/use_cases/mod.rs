//! Use cases - User story orchestration.
//!
//! Each module contains use cases for one area of play. Use cases load a
//! sheet through the repository port, call into the rules domain, and save
//! the complete new snapshot.

pub mod advancement;
pub mod creation;
pub mod dice;
pub mod error;
pub mod play;
mod sheet;

pub use advancement::{AdvancementSummary, AdvancementUseCases};
pub use creation::{CreationError, CreationUseCases, DraftView};
pub use dice::{CheckResult, DiceUseCases, PushResult};
pub use error::CharacterError;
pub use play::{PlayUseCases, SheetView};
pub use sheet::SheetUpdate;
