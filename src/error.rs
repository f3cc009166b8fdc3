//! Error types used by the keyqueue dispatcher.
//!
//! This module defines three enums:
//!
//! - [`ConfigError`]: invalid configuration, raised at construction time.
//! - [`PushError`]: a push that was not accepted (only after [`close`](crate::Queue::close)).
//! - [`QueueError`]: a request to the dispatcher that could not be served.
//!
//! Operation failures are **not** represented here: the dispatcher never
//! inspects what an operation's work body does.

use thiserror::Error;

/// # Errors produced while building a queue.
///
/// Misconfiguration fails fast instead of silently degrading.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A bounded queue was requested with a backlog capacity of zero.
    #[error("backlog capacity must be at least 1")]
    ZeroCapacity,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use keyqueue::ConfigError;
    ///
    /// assert_eq!(ConfigError::ZeroCapacity.as_label(), "config_zero_capacity");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroCapacity => "config_zero_capacity",
        }
    }
}

/// Error returned by [`Queue::try_push`](crate::Queue::try_push).
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// The queue was closed; the operation was dropped without running.
    #[error("queue closed")]
    Closed,
}

impl PushError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PushError::Closed => "push_closed",
        }
    }
}

/// Error returned by requests that need an answer from the dispatcher.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Dispatcher task has exited (queue closed and drained).
    #[error("dispatcher stopped")]
    Stopped,
}

impl QueueError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            QueueError::Stopped => "queue_stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(ConfigError::ZeroCapacity.as_label(), "config_zero_capacity");
        assert_eq!(PushError::Closed.as_label(), "push_closed");
        assert_eq!(QueueError::Stopped.as_label(), "queue_stopped");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "backlog capacity must be at least 1"
        );
        assert_eq!(PushError::Closed.to_string(), "queue closed");
        assert_eq!(QueueError::Stopped.to_string(), "dispatcher stopped");
    }
}
