//! # LogWriter: event logger
//!
//! A minimal subscriber that renders incoming [`Event`]s through `tracing`.
//! Use it for tests, demos, or as a starting point for your own subscriber.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  keyqueue: [queued] key="container-1" pending=1
//! WARN  keyqueue: [evicted] key="container-1" pending=2
//! INFO  keyqueue: [starting] key="container-1" pending=1
//! INFO  keyqueue: [completed] key="container-1" elapsed_ms=12
//! ERROR keyqueue: [panicked] key="container-2" elapsed_ms=3 reason="boom"
//! INFO  keyqueue: [idle] key="container-1"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::operations::QueueKey;
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<K: QueueKey> Subscribe<K> for LogWriter {
    async fn on_event(&self, e: &Event<K>) {
        match e.kind {
            EventKind::OperationQueued => {
                tracing::info!(target: "keyqueue", "[queued] key={:?} pending={:?}", e.key, e.pending);
            }
            EventKind::OperationEvicted => {
                tracing::warn!(target: "keyqueue", "[evicted] key={:?} pending={:?}", e.key, e.pending);
            }
            EventKind::OperationStarting => {
                tracing::info!(target: "keyqueue", "[starting] key={:?} pending={:?}", e.key, e.pending);
            }
            EventKind::OperationCompleted => {
                tracing::info!(target: "keyqueue", "[completed] key={:?} elapsed_ms={:?}", e.key, e.elapsed_ms);
            }
            EventKind::OperationPanicked => {
                tracing::error!(
                    target: "keyqueue",
                    "[panicked] key={:?} elapsed_ms={:?} reason={:?}",
                    e.key, e.elapsed_ms, e.reason
                );
            }
            EventKind::KeyIdle => {
                tracing::info!(target: "keyqueue", "[idle] key={:?}", e.key);
            }
            EventKind::PushRejected => {
                tracing::warn!(target: "keyqueue", "[push-rejected] key={:?}", e.key);
            }
            EventKind::QueueClosed => {
                tracing::info!(target: "keyqueue", "[closed] outstanding={:?}", e.pending);
            }
            EventKind::QueueDrained => {
                tracing::info!(target: "keyqueue", "[drained]");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "keyqueue", "[subscriber-overflow] {}", e.reason.as_deref().unwrap_or("unknown"));
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(target: "keyqueue", "[subscriber-panicked] {}", e.reason.as_deref().unwrap_or("unknown"));
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
