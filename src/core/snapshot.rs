//! # Point-in-time view of the dispatcher state.
//!
//! Produced by [`Queue::snapshot`](crate::Queue::snapshot). The dispatcher builds
//! it between two commands, so counts across keys are mutually consistent.

use std::time::Duration;

/// State of one busy key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySnapshot<K> {
    /// The key.
    pub key: K,
    /// Operations waiting behind the in-flight one.
    pub pending: usize,
    /// How long the in-flight operation has been running.
    pub running_for: Duration,
    /// Operations started since the key became busy (including the in-flight one).
    pub started: u64,
    /// Operations evicted since the key became busy.
    pub evicted: u64,
}

/// State of the whole queue.
///
/// Only busy keys are listed: idle keys hold no state. Order of `keys` is unspecified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueSnapshot<K> {
    /// Busy keys.
    pub keys: Vec<KeySnapshot<K>>,
    /// Per-key backlog capacity (`None` = unbounded).
    pub capacity: Option<usize>,
    /// True once `close()` has been observed.
    pub closing: bool,
}

impl<K: PartialEq> QueueSnapshot<K> {
    /// Returns the entry for `key`, if the key is busy.
    pub fn key(&self, key: &K) -> Option<&KeySnapshot<K>> {
        self.keys.iter().find(|k| &k.key == key)
    }

    /// True when no key has work running or pending.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of operations currently executing (one per busy key).
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.keys.len()
    }

    /// Number of operations waiting across all keys.
    pub fn pending_total(&self) -> usize {
        self.keys.iter().map(|k| k.pending).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &'static str, pending: usize) -> KeySnapshot<&'static str> {
        KeySnapshot {
            key,
            pending,
            running_for: Duration::ZERO,
            started: 1,
            evicted: 0,
        }
    }

    #[test]
    fn test_totals() {
        let snap = QueueSnapshot {
            keys: vec![entry("a", 2), entry("b", 0), entry("c", 5)],
            capacity: None,
            closing: false,
        };
        assert_eq!(snap.in_flight(), 3);
        assert_eq!(snap.pending_total(), 7);
        assert!(!snap.is_idle());
        assert_eq!(snap.key(&"c").map(|k| k.pending), Some(5));
        assert!(snap.key(&"z").is_none());
    }

    #[test]
    fn test_empty_is_idle() {
        let snap = QueueSnapshot::<u8> {
            keys: Vec::new(),
            capacity: Some(1),
            closing: true,
        };
        assert!(snap.is_idle());
        assert_eq!(snap.pending_total(), 0);
    }
}
