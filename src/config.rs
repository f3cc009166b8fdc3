//! # Queue configuration.
//!
//! Provides [`QueueConfig`], the settings a [`Queue`](crate::Queue) is built from.
//!
//! ## Sentinel values
//! - `capacity = None` → unbounded backlog per key
//! - `capacity = Some(0)` → rejected with [`ConfigError::ZeroCapacity`]
//! - `bus_capacity = 0` → clamped to 1

use crate::error::ConfigError;
use crate::policies::EvictionPolicy;

/// Configuration for a dispatcher queue.
///
/// ## Field semantics
/// - `capacity`: Maximum number of **pending** operations per key (`None` = unbounded).
///   The running operation is not counted.
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// Per-key backlog capacity.
    ///
    /// When a key's backlog is full, the oldest pending operation is dropped
    /// to make room for the new one.
    pub capacity: Option<usize>,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// skip older events.
    pub bus_capacity: usize,
}

impl QueueConfig {
    /// Unbounded configuration with default bus capacity.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Bounded configuration with default bus capacity.
    ///
    /// Validation happens when the queue is built.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Resolves the eviction policy.
    ///
    /// Fails with [`ConfigError::ZeroCapacity`] for `capacity = Some(0)`.
    pub fn eviction_policy(&self) -> Result<EvictionPolicy, ConfigError> {
        match self.capacity {
            None => Ok(EvictionPolicy::Unbounded),
            Some(n) => EvictionPolicy::drop_oldest(n).ok_or(ConfigError::ZeroCapacity),
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for QueueConfig {
    /// Default configuration:
    ///
    /// - `capacity = None` (unbounded)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            capacity: None,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let cfg = QueueConfig::default();
        assert_eq!(cfg.eviction_policy(), Ok(EvictionPolicy::Unbounded));
        assert_eq!(cfg.bus_capacity_clamped(), 1024);
    }

    #[test]
    fn test_bounded_resolves_policy() {
        let policy = QueueConfig::bounded(2).eviction_policy().unwrap();
        assert_eq!(policy.capacity(), Some(2));
    }

    #[test]
    fn test_zero_capacity_fails_fast() {
        assert_eq!(
            QueueConfig::bounded(0).eviction_policy(),
            Err(ConfigError::ZeroCapacity)
        );
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = QueueConfig {
            bus_capacity: 0,
            ..QueueConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
