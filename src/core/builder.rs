use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::config::QueueConfig;
use crate::core::queue::Queue;
use crate::error::ConfigError;
use crate::events::Bus;
use crate::operations::QueueKey;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing a [`Queue`] with optional subscribers.
pub struct QueueBuilder<K: QueueKey> {
    cfg: QueueConfig,
    subscribers: Vec<Arc<dyn Subscribe<K>>>,
}

impl<K: QueueKey> QueueBuilder<K> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: QueueConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (queued, evicted, started, completed, ...)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe<K>>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the configuration, spawns the dispatcher and returns the handle.
    ///
    /// Fails with [`ConfigError::ZeroCapacity`] for a zero backlog capacity.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn build(self) -> Result<Queue<K>, ConfigError> {
        let policy = self.cfg.eviction_policy()?;
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        // Subscribe before the dispatcher exists so no event is missed.
        let listener = (!self.subscribers.is_empty()).then(|| {
            let subs = SubscriberSet::new(self.subscribers, bus.clone());
            (bus.subscribe(), subs)
        });

        let queue = Queue::spawn(policy, bus);
        if let Some((rx, subs)) = listener {
            subscriber_listener(rx, subs, queue.drained_token());
        }
        Ok(queue)
    }
}

/// Forwards bus events to the subscriber set until the queue has drained.
fn subscriber_listener<K: QueueKey>(
    mut rx: tokio::sync::broadcast::Receiver<crate::events::Event<K>>,
    subs: SubscriberSet<K>,
    drained: CancellationToken,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Ok(ev) => subs.emit(ev),
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "subscriber listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = drained.cancelled() => break,
            }
        }
        subs.shutdown().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventKind};
    use crate::operations::OperationFn;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        kinds: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe<String> for Recorder {
        async fn on_event(&self, ev: &Event<String>) {
            self.kinds.lock().await.push(ev.kind);
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_lifecycle_events() {
        let rec = Arc::new(Recorder::default());
        let queue = Queue::builder(QueueConfig::default())
            .with_subscribers(vec![rec.clone() as Arc<dyn Subscribe<String>>])
            .build()
            .unwrap();

        queue.push(OperationFn::arc("job".to_string(), || async {}));
        queue.close();
        tokio::time::timeout(Duration::from_secs(5), queue.wait())
            .await
            .unwrap();

        // Listener drains buffered events before shutting the workers down.
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if rec.kinds.lock().await.contains(&EventKind::QueueDrained) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();

        let kinds = rec.kinds.lock().await.clone();
        let pos = |k: EventKind| kinds.iter().position(|x| *x == k).unwrap();
        assert!(pos(EventKind::OperationStarting) < pos(EventKind::KeyIdle));
        assert!(kinds.contains(&EventKind::OperationCompleted));
        assert!(kinds.contains(&EventKind::QueueClosed));
    }

    #[test]
    fn test_zero_capacity_fails_before_spawning() {
        let res = QueueBuilder::<String>::new(QueueConfig::bounded(0)).build();
        assert!(matches!(res, Err(ConfigError::ZeroCapacity)));
    }
}
