//! # Operation abstraction.
//!
//! This module defines the [`Operation`] trait: a unit of work identified by a key.
//! The common handle type is [`OperationRef`], an `Arc<dyn Operation<K>>` the
//! dispatcher holds until the operation has run (or was evicted).
//!
//! Keys are opaque: anything that is [`QueueKey`] (hashable, comparable, cloneable,
//! debuggable and thread-safe) partitions operations into serialization groups.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`Operation::execute`].
pub type BoxOperationFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Shared handle to an operation.
pub type OperationRef<K> = Arc<dyn Operation<K>>;

/// Identifier partitioning operations into independent serialization groups.
///
/// Blanket-implemented for every type with the required bounds
/// (`String`, `&'static str`, integers, UUIDs, tuples of those, ...).
pub trait QueueKey: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> QueueKey for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// # Keyed unit of work.
///
/// Operations with the same [`key`](Operation::key) run in push order, one at a time.
/// Operations with different keys run concurrently.
///
/// The dispatcher does not observe the outcome of [`execute`](Operation::execute):
/// success, failure and retries are the operation's own concern.
///
/// # Example
/// ```
/// use keyqueue::{BoxOperationFuture, Operation};
///
/// struct Restart {
///     container: String,
/// }
///
/// impl Operation<String> for Restart {
///     fn key(&self) -> String {
///         self.container.clone()
///     }
///
///     fn execute(&self) -> BoxOperationFuture {
///         let container = self.container.clone();
///         Box::pin(async move {
///             // restart `container`...
///             let _ = container;
///         })
///     }
/// }
/// ```
pub trait Operation<K: QueueKey>: Send + Sync + 'static {
    /// Returns the key this operation is serialized under.
    ///
    /// Must be stable: the dispatcher may call it more than once.
    fn key(&self) -> K;

    /// Creates the future that performs the work.
    ///
    /// Called exactly once per accepted, non-evicted operation.
    fn execute(&self) -> BoxOperationFuture;
}
