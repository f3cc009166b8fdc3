//! # Operation abstractions.
//!
//! This module provides the caller-facing unit of work:
//! - [`Operation`] - trait for keyed units of work
//! - [`OperationFn`] - closure-backed implementation
//! - [`OperationRef`] - shared reference to an operation (`Arc<dyn Operation<K>>`)
//! - [`QueueKey`] - bounds required of a key

mod operation;
mod operation_fn;

pub use operation::{BoxOperationFuture, Operation, OperationRef, QueueKey};
pub use operation_fn::OperationFn;
