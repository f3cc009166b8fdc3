//! Backlog policies.
//!
//! ## Contents
//! - [`EvictionPolicy`] how a busy key's backlog is bounded (unbounded / drop-oldest)
//!
//! ## Quick wiring
//! ```text
//! QueueConfig { capacity: Option<usize> }
//!      └─► QueueConfig::eviction_policy()  (rejects 0)
//!           └─► Dispatcher: policy.admit(pending, op) on every push to a busy key
//! ```

mod eviction;

pub use eviction::EvictionPolicy;
