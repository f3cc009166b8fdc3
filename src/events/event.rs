//! # Runtime events emitted by the dispatcher and execution launcher.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Operation lifecycle**: queued, evicted, starting, completed, panicked
//! - **Key lifecycle**: a key went idle and its state was released
//! - **Queue lifecycle**: pushes rejected after close, closed, drained
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the key,
//! backlog depth and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use keyqueue::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::OperationEvicted)
//!     .with_key("container-1")
//!     .with_pending(2);
//!
//! assert_eq!(ev.kind, EventKind::OperationEvicted);
//! assert_eq!(ev.key, Some("container-1"));
//! assert_eq!(ev.pending, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: `subscriber=<name> info=<panic message>`
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: `subscriber=<name> reason=<full|closed>`
    SubscriberOverflow,

    // === Operation lifecycle ===
    /// Operation appended to its key's backlog (key was busy).
    ///
    /// Sets:
    /// - `key`
    /// - `pending`: backlog length after the append
    OperationQueued,

    /// Oldest pending operation discarded to make room (bounded queues only).
    ///
    /// Sets:
    /// - `key`
    /// - `pending`: backlog length after the new operation was appended
    OperationEvicted,

    /// Operation handed to the launcher and about to execute.
    ///
    /// Sets:
    /// - `key`
    /// - `pending`: backlog length left behind for the key
    OperationStarting,

    /// Operation work returned normally.
    ///
    /// Sets:
    /// - `key`
    /// - `elapsed_ms`: execution time
    OperationCompleted,

    /// Operation work panicked; the key was released anyway.
    ///
    /// Sets:
    /// - `key`
    /// - `elapsed_ms`: execution time until the panic
    /// - `reason`: panic message
    OperationPanicked,

    // === Key lifecycle ===
    /// Key has no running or pending operations; its state was dropped.
    ///
    /// Sets:
    /// - `key`
    KeyIdle,

    // === Queue lifecycle ===
    /// Push arrived after `close()`; the operation was dropped.
    ///
    /// Sets:
    /// - `key`
    PushRejected,

    /// `close()` observed by the dispatcher.
    ///
    /// Sets:
    /// - `pending`: total operations still outstanding (running + pending)
    QueueClosed,

    /// Queue closed and every accepted operation finished; dispatcher exiting.
    QueueDrained,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event<K> {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Key of the operation, if applicable.
    pub key: Option<K>,
    /// Backlog length, meaning depends on the kind.
    pub pending: Option<u32>,
    /// Execution time in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
    /// Human-readable reason (panic message, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl<K> Event<K> {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            key: None,
            pending: None,
            elapsed_ms: None,
            reason: None,
        }
    }

    /// Attaches a key.
    #[inline]
    pub fn with_key(mut self, key: K) -> Self {
        self.key = Some(key);
        self
    }

    /// Attaches a backlog length (saturates at `u32::MAX`).
    #[inline]
    pub fn with_pending(mut self, n: usize) -> Self {
        self.pending = Some(u32::try_from(n).unwrap_or(u32::MAX));
        self
    }

    /// Attaches an execution time (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.elapsed_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::<u8>::new(EventKind::KeyIdle);
        let b = Event::<u8>::new(EventKind::KeyIdle);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_elapsed_saturates() {
        let ev = Event::<u8>::new(EventKind::OperationCompleted)
            .with_elapsed(Duration::from_secs(u64::MAX / 2));
        assert_eq!(ev.elapsed_ms, Some(u32::MAX));
    }

    #[test]
    fn test_subscriber_helpers() {
        let ev = Event::<u8>::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));
        assert!(ev.key.is_none());

        let ev = Event::<u8>::subscriber_panicked("audit", "boom".into());
        assert!(ev.is_subscriber_panic());
    }
}
