//! Bounded HP/WP counters

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Which pool a value belongs to; used in messages and outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    HitPoints,
    Willpower,
}

impl ResourceKind {
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::HitPoints => "HP",
            ResourceKind::Willpower => "WP",
        }
    }
}

/// A counter bounded to `[0, max]`.
///
/// # Invariants
///
/// - `0 <= current <= max` after every operation; over- and underflow clamp.
/// - `max >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePool {
    kind: ResourceKind,
    current: i32,
    max: i32,
}

impl ResourcePool {
    /// A full pool.
    pub fn full(kind: ResourceKind, max: i32) -> Self {
        let max = max.max(0);
        Self {
            kind,
            current: max,
            max,
        }
    }

    /// A pool at `current`, clamped into range.
    pub fn with_current(kind: ResourceKind, current: i32, max: i32) -> Self {
        let max = max.max(0);
        Self {
            kind,
            current: current.clamp(0, max),
            max,
        }
    }

    #[inline]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[inline]
    pub fn current(&self) -> i32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Remove up to `amount`; returns how much was actually removed.
    pub fn debit(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        let before = self.current;
        self.current = self.current.saturating_sub(amount).max(0);
        before - self.current
    }

    /// Add up to `amount`; returns how much was actually added.
    pub fn credit(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - before
    }

    /// Pay `cost` in full or not at all.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientResource` when `cost` exceeds the
    /// current value; the pool is left untouched.
    pub fn spend(&mut self, cost: i32) -> Result<i32, DomainError> {
        let cost = cost.max(0);
        if cost > self.current {
            return Err(DomainError::insufficient(
                self.kind.label(),
                cost,
                self.current,
            ));
        }
        self.current -= cost;
        Ok(self.current)
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Change the maximum, clamping the current value if needed.
    pub fn set_max(&mut self, max: i32) {
        self.max = max.max(0);
        self.current = self.current.min(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hp(current: i32, max: i32) -> ResourcePool {
        ResourcePool::with_current(ResourceKind::HitPoints, current, max)
    }

    #[test]
    fn construction_clamps() {
        assert_eq!(hp(20, 12).current(), 12);
        assert_eq!(hp(-3, 12).current(), 0);
        assert_eq!(hp(5, -1).max(), 0);
    }

    #[test]
    fn debit_clamps_at_zero() {
        let mut pool = hp(5, 12);
        assert_eq!(pool.debit(8), 5);
        assert_eq!(pool.current(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn credit_clamps_at_max() {
        let mut pool = hp(10, 12);
        assert_eq!(pool.credit(6), 2);
        assert!(pool.is_full());
    }

    #[test]
    fn negative_amounts_are_ignored() {
        let mut pool = hp(6, 12);
        assert_eq!(pool.debit(-4), 0);
        assert_eq!(pool.credit(-4), 0);
        assert_eq!(pool.current(), 6);
    }

    #[test]
    fn spend_is_all_or_nothing() {
        let mut wp = ResourcePool::with_current(ResourceKind::Willpower, 2, 10);
        let err = wp.spend(3).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientResource {
                resource: "WP",
                required: 3,
                available: 2
            }
        );
        assert_eq!(wp.current(), 2);
        assert_eq!(wp.spend(2).unwrap(), 0);
    }

    #[test]
    fn lowering_max_clamps_current() {
        let mut pool = ResourcePool::full(ResourceKind::Willpower, 14);
        pool.set_max(11);
        assert_eq!(pool.current(), 11);
        pool.set_max(15);
        assert_eq!(pool.current(), 11);
    }

    #[test]
    fn never_leaves_bounds_under_mixed_operations() {
        let mut pool = hp(7, 13);
        let amounts = [5, -2, 30, 1, 9, 14, 3, 100, 0, 6];
        for (i, amount) in amounts.into_iter().enumerate() {
            if i % 3 == 0 {
                pool.credit(amount);
            } else if i % 3 == 1 {
                pool.debit(amount);
            } else {
                let _ = pool.spend(amount);
            }
            assert!((0..=pool.max()).contains(&pool.current()));
        }
    }
}
