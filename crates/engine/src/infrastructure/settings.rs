//! Engine settings read from the environment.
//!
//! | variable                  | default                   | meaning                          |
//! |---------------------------|---------------------------|----------------------------------|
//! | `SHEETSMITH_ROLL_HISTORY` | 20                        | rolls kept per session           |
//! | `SHEETSMITH_RNG_SEED`     | unset (system randomness) | seed for reproducible sessions   |
//! | `SHEETSMITH_DATA_DIR`     | unset (in-memory storage) | directory for JSON sheets        |
//! | `SHEETSMITH_LOG`          | `sheetsmith_engine=debug` | log filter when `RUST_LOG` unset |
//!
//! Invalid values fall back to the default with a warning.

use std::path::PathBuf;

use sheetsmith_domain::DEFAULT_HISTORY_CAPACITY;

pub const DEFAULT_LOG_FILTER: &str = "sheetsmith_engine=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub roll_history: usize,
    pub rng_seed: Option<u64>,
    pub data_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            roll_history: DEFAULT_HISTORY_CAPACITY,
            rng_seed: None,
            data_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let roll_history = match value("SHEETSMITH_ROLL_HISTORY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        default = defaults.roll_history,
                        "Invalid SHEETSMITH_ROLL_HISTORY, using default"
                    );
                    defaults.roll_history
                }
            },
            None => defaults.roll_history,
        };

        let rng_seed = value("SHEETSMITH_RNG_SEED").and_then(|raw| match raw.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(
                    value = %raw,
                    "Invalid SHEETSMITH_RNG_SEED, using system randomness"
                );
                None
            }
        });

        Self {
            roll_history,
            rng_seed,
            data_dir: value("SHEETSMITH_DATA_DIR").map(PathBuf::from),
            log_filter: value("SHEETSMITH_LOG").unwrap_or(defaults.log_filter),
        }
    }
}
