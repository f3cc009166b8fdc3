//! # Queue: caller-facing handle to the dispatcher.
//!
//! [`Queue`] is a cheap, cloneable handle. Every clone talks to the same
//! dispatcher task through an unbounded channel, so [`Queue::push`] never waits
//! on capacity or on running operations.
//!
//! ## Lifecycle
//! ```text
//! Queue::new() / Queue::bounded(n) / Queue::builder(cfg).build()
//!     └─► spawns Dispatcher::run()            (needs a tokio runtime)
//!
//! push(op) ───────────► Command::Push         (fire-and-forget)
//! snapshot().await ───► Command::Snapshot     (round-trip)
//! close() ────────────► Command::Close        (idempotent)
//! wait().await        resolves once closed and every accepted op is done
//!
//! last handle dropped ─► same as close(): accepted work still runs
//! ```
//!
//! ## Example
//! ```rust
//! use keyqueue::{OperationFn, Queue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let queue: Queue<&'static str> = Queue::new();
//!
//!     for step in 1..=3 {
//!         queue.push(OperationFn::arc("container-1", move || async move {
//!             println!("container-1 step {step}");
//!         }));
//!     }
//!
//!     queue.close();
//!     queue.wait().await;
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::config::QueueConfig;
use crate::core::builder::QueueBuilder;
use crate::core::dispatcher::Command;
use crate::core::snapshot::QueueSnapshot;
use crate::error::{ConfigError, PushError, QueueError};
use crate::events::{Bus, Event, EventKind};
use crate::operations::{OperationRef, QueueKey};
use crate::policies::EvictionPolicy;

/// State shared by every clone of a [`Queue`].
struct Shared<K: QueueKey> {
    tx: mpsc::UnboundedSender<Command<K>>,
    bus: Bus<K>,
    policy: EvictionPolicy,
    closed: AtomicBool,
    drained: CancellationToken,
}

impl<K: QueueKey> Shared<K> {
    /// Marks the queue closed; returns `true` for the first caller only.
    fn mark_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }
}

impl<K: QueueKey> Drop for Shared<K> {
    fn drop(&mut self) {
        if self.mark_closed() {
            let _ = self.tx.send(Command::Close);
        }
    }
}

/// Dispatcher handle: serializes operations per key, runs distinct keys concurrently.
pub struct Queue<K: QueueKey> {
    shared: Arc<Shared<K>>,
}

impl<K: QueueKey> Clone for Queue<K> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K: QueueKey> Default for Queue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: QueueKey> Queue<K> {
    /// Creates an unbounded queue.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn new() -> Self {
        let cfg = QueueConfig::unbounded();
        Self::spawn(EvictionPolicy::Unbounded, Bus::new(cfg.bus_capacity_clamped()))
    }

    /// Creates a queue whose per-key backlog holds at most `capacity` operations.
    ///
    /// When a key's backlog is full, the oldest pending operation is discarded
    /// to make room for the new one. The running operation is never discarded.
    ///
    /// Fails with [`ConfigError::ZeroCapacity`] when `capacity == 0`.
    pub fn bounded(capacity: usize) -> Result<Self, ConfigError> {
        Self::builder(QueueConfig::bounded(capacity)).build()
    }

    /// Returns a builder for a queue with subscribers.
    pub fn builder(cfg: QueueConfig) -> QueueBuilder<K> {
        QueueBuilder::new(cfg)
    }

    /// Spawns the dispatcher task and returns the first handle.
    pub(crate) fn spawn(policy: EvictionPolicy, bus: Bus<K>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let drained = CancellationToken::new();

        let dispatcher = super::dispatcher::Dispatcher::new(policy, bus.clone(), tx.clone());
        tokio::spawn(dispatcher.run(rx, drained.clone()));

        Self {
            shared: Arc::new(Shared {
                tx,
                bus,
                policy,
                closed: AtomicBool::new(false),
                drained,
            }),
        }
    }

    /// Token cancelled by the dispatcher once it has drained.
    pub(crate) fn drained_token(&self) -> CancellationToken {
        self.shared.drained.clone()
    }

    /// Enqueues an operation for execution (fire-and-forget).
    ///
    /// The operation runs after every operation previously pushed with the same key,
    /// or is silently discarded if a bounded backlog overflows before it starts.
    ///
    /// After [`close`](Self::close) the operation is dropped without running;
    /// use [`try_push`](Self::try_push) to observe that.
    pub fn push(&self, op: OperationRef<K>) {
        if let Err(e) = self.try_push(op) {
            tracing::debug!(error = %e, "push dropped");
        }
    }

    /// Like [`push`](Self::push), but reports a closed queue.
    ///
    /// A push racing with `close()` from another handle may be dropped.
    pub fn try_push(&self, op: OperationRef<K>) -> Result<(), PushError> {
        if self.shared.closed.load(Ordering::Acquire) {
            self.shared
                .bus
                .publish(Event::new(EventKind::PushRejected).with_key(op.key()));
            return Err(PushError::Closed);
        }
        self.shared
            .tx
            .send(Command::Push(op))
            .map_err(|_| PushError::Closed)
    }

    /// Stops accepting pushes. Already accepted operations still run.
    ///
    /// Idempotent.
    pub fn close(&self) {
        if self.shared.mark_closed() {
            let _ = self.shared.tx.send(Command::Close);
        }
    }

    /// True once [`close`](Self::close) was called on any handle.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Waits until the queue is closed and every accepted operation has
    /// completed or been evicted.
    ///
    /// Never resolves if the queue is not closed.
    pub async fn wait(&self) {
        self.shared.drained.cancelled().await;
    }

    /// Returns a consistent copy of the per-key state.
    ///
    /// Fails with [`QueueError::Stopped`] once the dispatcher has drained.
    pub async fn snapshot(&self) -> Result<QueueSnapshot<K>, QueueError> {
        let (reply, rx) = oneshot::channel();
        self.shared
            .tx
            .send(Command::Snapshot(reply))
            .map_err(|_| QueueError::Stopped)?;
        rx.await.map_err(|_| QueueError::Stopped)
    }

    /// Returns the eviction policy this queue was built with.
    pub fn policy(&self) -> EvictionPolicy {
        self.shared.policy
    }

    /// Creates a raw receiver for runtime events published after this call.
    ///
    /// Prefer [`QueueBuilder::with_subscribers`] for long-lived observers.
    pub fn subscribe(&self) -> broadcast::Receiver<Event<K>> {
        self.shared.bus.subscribe()
    }
}
