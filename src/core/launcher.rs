//! # Execution launcher.
//!
//! Runs one operation on its own tokio task and reports back to the dispatcher.
//!
//! ## Flow
//! ```text
//! launch(key, op)
//!   └─► tokio::spawn
//!         ├─► op.execute().await   (catch_unwind)
//!         │     ├─ returned  ──► publish OperationCompleted
//!         │     └─ panicked  ──► publish OperationPanicked
//!         └─► send Complete(key)   (always, exactly once)
//! ```
//!
//! ## Rules
//! - No timeout, retry or cancellation is applied to the work body.
//! - A panic in `execute` (synchronous or while polling) is caught here, so the
//!   key's slot is always released.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::core::dispatcher::Command;
use crate::events::{Bus, Event, EventKind};
use crate::operations::{OperationRef, QueueKey};

/// Spawns `op` and sends `Command::Complete(key)` once it has finished.
pub(super) fn launch<K: QueueKey>(
    key: K,
    op: OperationRef<K>,
    completions: mpsc::UnboundedSender<Command<K>>,
    bus: Bus<K>,
) {
    tokio::spawn(async move {
        let started = Instant::now();
        let res = AssertUnwindSafe(async { op.execute().await })
            .catch_unwind()
            .await;
        let elapsed = started.elapsed();

        match res {
            Ok(()) => {
                bus.publish(
                    Event::new(EventKind::OperationCompleted)
                        .with_key(key.clone())
                        .with_elapsed(elapsed),
                );
            }
            Err(panic_err) => {
                let info = panic_message(panic_err.as_ref());
                tracing::warn!(key = ?key, %info, "operation panicked");
                bus.publish(
                    Event::new(EventKind::OperationPanicked)
                        .with_key(key.clone())
                        .with_elapsed(elapsed)
                        .with_reason(info),
                );
            }
        }

        drop(op);
        let _ = completions.send(Command::Complete(key));
    });
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationFn;
    use std::time::Duration;

    #[tokio::test]
    async fn test_reports_completion_after_work() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bus = Bus::new(8);
        let mut events = bus.subscribe();

        launch("k", OperationFn::arc("k", || async {}), tx, bus);

        let cmd = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(cmd, Command::Complete("k")));
        assert_eq!(events.recv().await.unwrap().kind, EventKind::OperationCompleted);
    }

    #[tokio::test]
    async fn test_reports_completion_after_panic() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bus = Bus::new(8);
        let mut events = bus.subscribe();

        let op: OperationRef<&'static str> = OperationFn::arc("k", || async {
            panic!("work failed");
        });
        launch("k", op, tx, bus);

        let cmd = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(cmd, Command::Complete("k")));

        let ev = events.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::OperationPanicked);
        assert_eq!(ev.reason.as_deref(), Some("work failed"));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "unknown panic");
    }
}
