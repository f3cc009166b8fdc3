//! # keyqueue
//!
//! **keyqueue** is a per-key operation dispatcher for tokio.
//!
//! Operations that share a key run strictly in push order and never overlap.
//! Operations with different keys run concurrently. Use it to serialize access to
//! a per-entity resource ("all actions on container X run in order") while keeping
//! full parallelism across entities.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller            caller            caller
//!     │ push(op)        │ push(op)        │ close() / wait() / snapshot()
//!     ▼                 ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Queue (cloneable handle)                                         │
//! │  - unbounded command channel (push never waits)                   │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher (single tokio task, sole owner of per-key state)      │
//! │  HashMap<K, KeyQueue { pending: VecDeque<op>, .. }>               │
//! │  - Push:     key idle → launch now; key busy → EvictionPolicy     │
//! │  - Complete: pop next pending → launch; none → drop key state     │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!  ┌────────────┐     ┌────────────┐     ┌────────────┐
//!  │ launcher   │     │ launcher   │     │ launcher   │   one tokio task
//!  │ key "a"    │     │ key "b"    │     │ key "c"    │   per running op
//!  └─────┬──────┘     └─────┬──────┘     └─────┬──────┘
//!        └──── Complete(key), always, even on panic ──► Dispatcher
//!
//! Dispatcher / launchers ── Event ──► Bus ──► SubscriberSet ──► Subscribe impls
//! ```
//!
//! ### Operation lifecycle
//! ```text
//! push ──► Queued ──► Executing ──► Completed
//!            │
//!            └──► Evicted   (bounded queues only, never once started)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                       |
//! |-------------------|--------------------------------------------------------------|------------------------------------------|
//! | **Dispatch**      | Per-key FIFO, cross-key concurrency, drain on close.         | [`Queue`], [`QueueBuilder`]              |
//! | **Operations**    | Keyed units of work, as trait impls or closures.             | [`Operation`], [`OperationFn`]           |
//! | **Policies**      | Bound each key's backlog by dropping the oldest pending op.  | [`EvictionPolicy`]                       |
//! | **Subscriber API**| Observe queue/operation lifecycle events.                    | [`Subscribe`], [`Event`], [`EventKind`]  |
//! | **Introspection** | Consistent view of busy keys and backlogs.                   | [`QueueSnapshot`]                        |
//! | **Errors**        | Typed construction/push errors.                              | [`ConfigError`], [`PushError`]           |
//! | **Configuration** | Centralize queue settings.                                   | [`QueueConfig`]                          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] that renders events via `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use keyqueue::{OperationFn, Queue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // At most 8 operations wait per key; older ones are dropped first.
//!     let queue: Queue<String> = Queue::bounded(8)?;
//!
//!     for container in ["web", "db"] {
//!         for action in ["stop", "start"] {
//!             queue.push(OperationFn::arc(container.to_string(), move || async move {
//!                 tokio::time::sleep(Duration::from_millis(10)).await;
//!                 println!("{container}: {action}");
//!             }));
//!         }
//!     }
//!
//!     queue.close();
//!     queue.wait().await;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod operations;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use config::QueueConfig;
pub use crate::core::{KeySnapshot, Queue, QueueBuilder, QueueSnapshot};
pub use error::{ConfigError, PushError, QueueError};
pub use events::{Event, EventKind};
pub use operations::{BoxOperationFuture, Operation, OperationFn, OperationRef, QueueKey};
pub use policies::EvictionPolicy;
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
