//! Dispatcher core: per-key state, scheduling actor and execution launcher.
//!
//! The only public API from this module is [`Queue`] (with its [`QueueBuilder`]
//! and [`QueueSnapshot`] view). Everything else runs behind the handle.
//!
//! Internal modules:
//! - [`key_queue`]: per-key backlog and in-flight bookkeeping;
//! - [`dispatcher`]: the single task that owns every `KeyQueue`;
//! - [`launcher`]: runs one operation and reports its completion;
//! - [`queue`]: caller-facing handle (push, close, wait, snapshot);
//! - [`builder`]: validated construction with subscribers.
//!
//! ```text
//!  Queue::push ──► Command::Push ──┐
//!                                  ▼
//!                          ┌───────────────┐   launch    ┌────────────┐
//!                          │  Dispatcher   │────────────►│  launcher  │ (one tokio task per op)
//!                          │ HashMap<K,    │             └─────┬──────┘
//!                          │   KeyQueue>   │◄──Command::Complete┘
//!                          └───────────────┘
//! ```

mod builder;
mod dispatcher;
mod key_queue;
mod launcher;
mod queue;
mod snapshot;

pub use builder::QueueBuilder;
pub use queue::Queue;
pub use snapshot::{KeySnapshot, QueueSnapshot};

pub(crate) use launcher::panic_message;
