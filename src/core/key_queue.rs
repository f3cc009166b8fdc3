use std::collections::VecDeque;
use std::time::Instant;

use crate::operations::{OperationRef, QueueKey};
use crate::policies::EvictionPolicy;

/// State of a single busy key.
///
/// A `KeyQueue` exists only while an operation for its key is in flight;
/// the dispatcher drops it as soon as the key has nothing running and nothing pending.
pub(super) struct KeyQueue<K: QueueKey> {
    /// Operations waiting for the key (FIFO order, none started).
    pub pending: VecDeque<OperationRef<K>>,

    /// When the in-flight operation started.
    pub running_since: Instant,

    /// Operations started since the key became busy.
    pub started: u64,

    /// Operations evicted since the key became busy.
    pub evicted: u64,
}

impl<K: QueueKey> KeyQueue<K> {
    /// Creates the state for a key whose first operation is being launched.
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            running_since: Instant::now(),
            started: 1,
            evicted: 0,
        }
    }

    /// Appends `op` to the backlog under `policy`.
    ///
    /// Returns the evicted operation, if the backlog was full.
    pub fn enqueue(&mut self, policy: &EvictionPolicy, op: OperationRef<K>) -> Option<OperationRef<K>> {
        let evicted = policy.admit(&mut self.pending, op);
        if evicted.is_some() {
            self.evicted += 1;
        }
        evicted
    }

    /// Pops the next operation to run and marks it in flight.
    ///
    /// `None` means the key is idle.
    pub fn start_next(&mut self) -> Option<OperationRef<K>> {
        let next = self.pending.pop_front()?;
        self.running_since = Instant::now();
        self.started += 1;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationFn;

    fn noop(key: &'static str) -> OperationRef<&'static str> {
        OperationFn::arc(key, || async {})
    }

    #[test]
    fn test_new_key_counts_first_start() {
        let q = KeyQueue::<&str>::new();
        assert!(q.pending.is_empty());
        assert_eq!(q.started, 1);
        assert_eq!(q.evicted, 0);
    }

    #[test]
    fn test_start_next_is_fifo() {
        let mut q = KeyQueue::new();
        let first = noop("k");
        let second = noop("k");
        q.enqueue(&EvictionPolicy::Unbounded, first.clone());
        q.enqueue(&EvictionPolicy::Unbounded, second.clone());

        let a = q.start_next().unwrap();
        let b = q.start_next().unwrap();
        assert!(std::sync::Arc::ptr_eq(&a, &first));
        assert!(std::sync::Arc::ptr_eq(&b, &second));
        assert!(q.start_next().is_none());
        assert_eq!(q.started, 3);
    }

    #[test]
    fn test_enqueue_counts_evictions() {
        let policy = EvictionPolicy::drop_oldest(1).unwrap();
        let mut q = KeyQueue::new();
        let oldest = noop("k");

        assert!(q.enqueue(&policy, oldest.clone()).is_none());
        let evicted = q.enqueue(&policy, noop("k")).unwrap();

        assert!(std::sync::Arc::ptr_eq(&evicted, &oldest));
        assert_eq!(q.pending.len(), 1);
        assert_eq!(q.evicted, 1);
    }
}
