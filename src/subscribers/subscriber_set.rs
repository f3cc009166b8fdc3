//! # Non-blocking event fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`]: distributes events to multiple subscribers
//! concurrently without blocking the publisher.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     ├──► [queue 2] ──► worker 2 ──► subscriber2.on_event()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **No cross-subscriber ordering**: subscriber A may process event N while B processes N+5
//! - **Overflow**: event dropped for that subscriber only, `SubscriberOverflow` published
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Isolation**: slow/panicking subscriber doesn't affect others
//! - **Per-subscriber FIFO**: each subscriber sees events in order
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind};
use crate::operations::QueueKey;
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel<K> {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event<K>>>,
}

/// Fan-out coordinator for multiple event subscribers.
pub struct SubscriberSet<K> {
    channels: Vec<SubscriberChannel<K>>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus<K>,
}

impl<K: QueueKey> SubscriberSet<K> {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Minimum queue capacity is 1 (enforced).
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe<K>>>, bus: Bus<K>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event<K>>>(cap);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = crate::core::panic_message(panic_err.as_ref());
                        tracing::warn!(subscriber = sub.name(), %info, "subscriber panicked");
                        bus_for_worker.publish(Event::subscriber_panicked(sub.name(), info));
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits an event to all subscribers.
    ///
    /// - Uses `try_send` (non-blocking)
    /// - On queue full/closed: drops event, publishes `SubscriberOverflow`
    ///
    /// `SubscriberOverflow` events are not re-published if they themselves overflow.
    pub fn emit(&self, event: Event<K>) {
        let is_overflow_evt = matches!(event.kind, EventKind::SubscriberOverflow);
        let event = Arc::new(event);

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            tracing::debug!(subscriber = channel.name, reason, "subscriber dropped event");
            if !is_overflow_evt {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Gracefully shuts down all subscriber workers.
    ///
    /// 1. Drops all channel senders (workers see channel closed)
    /// 2. Awaits all worker tasks to finish
    pub async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe<u32> for Recorder {
        async fn on_event(&self, ev: &Event<u32>) {
            self.seen.lock().await.push(ev.kind);
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Exploder;

    #[async_trait]
    impl Subscribe<u32> for Exploder {
        async fn on_event(&self, _ev: &Event<u32>) {
            panic!("boom");
        }
        fn name(&self) -> &'static str {
            "exploder"
        }
    }

    #[tokio::test]
    async fn test_fan_out_preserves_per_subscriber_order() {
        let rec = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let set = SubscriberSet::new(vec![rec.clone() as Arc<dyn Subscribe<u32>>], Bus::new(16));

        set.emit(Event::new(EventKind::OperationQueued));
        set.emit(Event::new(EventKind::OperationStarting));
        set.emit(Event::new(EventKind::KeyIdle));
        set.shutdown().await;

        assert_eq!(
            *rec.seen.lock().await,
            vec![
                EventKind::OperationQueued,
                EventKind::OperationStarting,
                EventKind::KeyIdle
            ]
        );
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_reported() {
        let bus = Bus::<u32>::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Exploder) as Arc<dyn Subscribe<u32>>], bus);

        set.emit(Event::new(EventKind::KeyIdle));

        let ev = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("panic event not published")
            .unwrap();
        assert!(ev.is_subscriber_panic());
        assert_eq!(
            ev.reason.as_deref(),
            Some("subscriber=exploder info=boom")
        );
        set.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_set() {
        let set = SubscriberSet::<u32>::new(Vec::new(), Bus::new(1));
        set.emit(Event::new(EventKind::QueueDrained));
        set.shutdown().await;
    }
}
