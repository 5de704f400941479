//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};
use uuid::Uuid;

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `min..=max`.
    fn gen_range(&self, min: i32, max: i32) -> i32;
    fn gen_uuid(&self) -> Uuid;

    /// One die of `size` faces.
    fn roll_die(&self, size: u8) -> u8 {
        let size = size.max(1);
        let value = self.gen_range(1, i32::from(size)).clamp(1, i32::from(size));
        // clamped into 1..=size, which always fits
        value as u8
    }
}
