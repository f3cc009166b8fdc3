//! # Function-backed operation (`OperationFn`)
//!
//! [`OperationFn`] pairs a key with a closure `F: Fn() -> Fut`, producing a fresh
//! future when the dispatcher launches it.
//!
//! ## Example
//! ```rust
//! use keyqueue::{Operation, OperationFn, OperationRef};
//!
//! let op: OperationRef<&'static str> = OperationFn::arc("container-1", || async {
//!     // stop the container...
//! });
//!
//! assert_eq!(op.key(), "container-1");
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::operations::operation::{BoxOperationFuture, Operation, QueueKey};

/// Function-backed operation implementation.
pub struct OperationFn<K, F> {
    key: K,
    f: F,
}

impl<K, F> OperationFn<K, F> {
    /// Creates a new function-backed operation.
    ///
    /// Prefer [`OperationFn::arc`] when you immediately need an [`OperationRef`](crate::OperationRef).
    pub fn new(key: K, f: F) -> Self {
        Self { key, f }
    }

    /// Creates the operation and returns it as a shared handle.
    pub fn arc(key: K, f: F) -> Arc<Self> {
        Arc::new(Self::new(key, f))
    }
}

impl<K, F, Fut> Operation<K> for OperationFn<K, F>
where
    K: QueueKey,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn key(&self) -> K {
        self.key.clone()
    }

    fn execute(&self) -> BoxOperationFuture {
        Box::pin((self.f)())
    }
}
