//! # Dispatcher: the single owner of per-key state.
//!
//! The dispatcher is one tokio task consuming one command channel. It is the
//! only code that reads or writes the key map, so no lock guards it: a push and
//! a completion for the same key can never race, and "is this key idle" is
//! always decided against a consistent view.
//!
//! ## Commands
//! ```text
//! Push(op)
//!   ├─ key unknown ──► insert KeyQueue, launch op immediately
//!   └─ key busy    ──► policy.admit(pending, op)   (may evict pending[0])
//!
//! Complete(key)
//!   ├─ pending empty ──► remove key               (KeyIdle)
//!   └─ otherwise     ──► pop front, launch it
//!
//! Snapshot(reply) ──► reply with a copy of per-key counters
//! Close           ──► stop once every key is idle
//! ```
//!
//! ## Rules
//! - At most one operation per key is in flight.
//! - Per-key launch order equals the order pushes were received (minus evictions).
//! - Handling a command never waits on operation execution.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::core::key_queue::KeyQueue;
use crate::core::launcher::launch;
use crate::core::snapshot::{KeySnapshot, QueueSnapshot};
use crate::events::{Bus, Event, EventKind};
use crate::operations::{OperationRef, QueueKey};
use crate::policies::EvictionPolicy;

/// Messages accepted by the dispatcher.
pub(crate) enum Command<K: QueueKey> {
    /// New operation from a caller.
    Push(OperationRef<K>),
    /// The in-flight operation for the key has finished.
    Complete(K),
    /// Request for a consistent copy of the per-key state.
    Snapshot(oneshot::Sender<QueueSnapshot<K>>),
    /// Stop accepting work once all keys are idle.
    Close,
}

pub(crate) struct Dispatcher<K: QueueKey> {
    keys: HashMap<K, KeyQueue<K>>,
    policy: EvictionPolicy,
    bus: Bus<K>,

    // Handed to launched operations for their completion report.
    completions: mpsc::UnboundedSender<Command<K>>,
    closing: bool,
}

impl<K: QueueKey> Dispatcher<K> {
    pub fn new(
        policy: EvictionPolicy,
        bus: Bus<K>,
        completions: mpsc::UnboundedSender<Command<K>>,
    ) -> Self {
        Self {
            keys: HashMap::new(),
            policy,
            bus,
            completions,
            closing: false,
        }
    }

    /// Processes commands until the queue is closed and every key is idle.
    ///
    /// Cancels `drained` on exit.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command<K>>, drained: CancellationToken) {
        while let Some(cmd) = rx.recv().await {
            self.handle(cmd);
            if self.closing && self.keys.is_empty() {
                break;
            }
        }

        tracing::debug!("dispatcher drained");
        self.bus.publish(Event::new(EventKind::QueueDrained));
        drained.cancel();
    }

    fn handle(&mut self, cmd: Command<K>) {
        match cmd {
            Command::Push(op) => self.on_push(op),
            Command::Complete(key) => self.on_complete(key),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::Close => self.on_close(),
        }
    }

    /// Handles a new operation.
    fn on_push(&mut self, op: OperationRef<K>) {
        let key = op.key();

        let Some(state) = self.keys.get_mut(&key) else {
            self.keys.insert(key.clone(), KeyQueue::new());
            self.start(key, op, 0);
            return;
        };

        let evicted = state.enqueue(&self.policy, op);
        let pending = state.pending.len();

        if evicted.is_some() {
            tracing::trace!(key = ?key, pending, "evicted oldest pending operation");
            self.bus.publish(
                Event::new(EventKind::OperationEvicted)
                    .with_key(key.clone())
                    .with_pending(pending),
            );
        }
        self.bus.publish(
            Event::new(EventKind::OperationQueued)
                .with_key(key)
                .with_pending(pending),
        );
    }

    /// Handles the completion report for the key's in-flight operation.
    fn on_complete(&mut self, key: K) {
        let Some(state) = self.keys.get_mut(&key) else {
            tracing::error!(key = ?key, "completion for a key with nothing in flight");
            return;
        };

        match state.start_next() {
            Some(next) => {
                let pending = state.pending.len();
                self.start(key, next, pending);
            }
            None => {
                self.keys.remove(&key);
                self.bus
                    .publish(Event::new(EventKind::KeyIdle).with_key(key));
            }
        }
    }

    fn on_close(&mut self) {
        if self.closing {
            return;
        }
        self.closing = true;

        let outstanding: usize = self.keys.values().map(|s| s.pending.len() + 1).sum();
        tracing::debug!(keys = self.keys.len(), outstanding, "queue closed");
        self.bus
            .publish(Event::new(EventKind::QueueClosed).with_pending(outstanding));
    }

    /// Publishes `OperationStarting` and hands the operation to the launcher.
    fn start(&self, key: K, op: OperationRef<K>, pending: usize) {
        self.bus.publish(
            Event::new(EventKind::OperationStarting)
                .with_key(key.clone())
                .with_pending(pending),
        );
        launch(key, op, self.completions.clone(), self.bus.clone());
    }

    fn snapshot(&self) -> QueueSnapshot<K> {
        let keys = self
            .keys
            .iter()
            .map(|(key, state)| KeySnapshot {
                key: key.clone(),
                pending: state.pending.len(),
                running_for: state.running_since.elapsed(),
                started: state.started,
                evicted: state.evicted,
            })
            .collect();

        QueueSnapshot {
            keys,
            capacity: self.policy.capacity(),
            closing: self.closing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationFn;

    fn noop(key: &'static str) -> OperationRef<&'static str> {
        OperationFn::arc(key, || async {})
    }

    fn dispatcher(policy: EvictionPolicy) -> (Dispatcher<&'static str>, mpsc::UnboundedReceiver<Command<&'static str>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Dispatcher::new(policy, Bus::new(64), tx), rx)
    }

    #[tokio::test]
    async fn test_first_push_launches_and_later_pushes_queue() {
        let (mut d, _rx) = dispatcher(EvictionPolicy::Unbounded);

        d.on_push(noop("a"));
        assert_eq!(d.keys["a"].pending.len(), 0);

        d.on_push(noop("a"));
        d.on_push(noop("a"));
        assert_eq!(d.keys["a"].pending.len(), 2);

        d.on_push(noop("b"));
        assert_eq!(d.keys.len(), 2);
        assert_eq!(d.keys["b"].pending.len(), 0);
    }

    #[tokio::test]
    async fn test_completion_pops_next_then_releases_key() {
        let (mut d, _rx) = dispatcher(EvictionPolicy::Unbounded);
        d.on_push(noop("a"));
        d.on_push(noop("a"));

        d.on_complete("a");
        assert_eq!(d.keys["a"].pending.len(), 0);
        assert_eq!(d.keys["a"].started, 2);

        d.on_complete("a");
        assert!(d.keys.is_empty());
    }

    #[tokio::test]
    async fn test_bounded_backlog_evicts_oldest() {
        let (mut d, _rx) = dispatcher(EvictionPolicy::drop_oldest(2).unwrap());
        d.on_push(noop("a"));
        for _ in 0..5 {
            d.on_push(noop("a"));
        }

        let state = &d.keys["a"];
        assert_eq!(state.pending.len(), 2);
        assert_eq!(state.evicted, 3);
    }

    #[tokio::test]
    async fn test_unknown_completion_is_ignored() {
        let (mut d, _rx) = dispatcher(EvictionPolicy::Unbounded);
        d.on_complete("ghost");
        assert!(d.keys.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_reflects_state() {
        let (mut d, _rx) = dispatcher(EvictionPolicy::drop_oldest(4).unwrap());
        d.on_push(noop("a"));
        d.on_push(noop("a"));
        d.on_close();

        let snap = d.snapshot();
        assert_eq!(snap.in_flight(), 1);
        assert_eq!(snap.pending_total(), 1);
        assert_eq!(snap.capacity, Some(4));
        assert!(snap.closing);
    }

    #[tokio::test]
    async fn test_run_exits_after_close_when_idle() {
        let (tx, rx) = mpsc::unbounded_channel();
        let d = Dispatcher::<&'static str>::new(EvictionPolicy::Unbounded, Bus::new(8), tx.clone());
        let drained = CancellationToken::new();
        let handle = tokio::spawn(d.run(rx, drained.clone()));

        tx.send(Command::Push(noop("a"))).ok();
        tx.send(Command::Close).ok();

        tokio::time::timeout(std::time::Duration::from_secs(5), drained.cancelled())
            .await
            .expect("dispatcher did not drain");
        handle.await.unwrap();
    }
}
