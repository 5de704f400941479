//! Sheetsmith engine library.
//!
//! Runs the character rules engine behind ports: storage, clock and dice.
//!
//! ## Structure
//!
//! - `use_cases/` - Character creation, play, dice and advancement flows
//! - `stores/` - In-process roll sessions
//! - `infrastructure/` - Ports and their adapters (JSON storage, clocks, randomness, settings)
//! - `api/` - Line-oriented console entry point
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
