//! # Eviction policy for per-key backlogs.
//!
//! [`EvictionPolicy`] decides what happens to a key's backlog when a new
//! operation arrives while the key is busy.
//!
//! ## Variants
//! - `Unbounded`: every operation is kept; the backlog grows without limit.
//! - `DropOldest`: the backlog holds at most `capacity` operations. A push into a
//!   full backlog first removes the oldest **pending** entry (index 0), then appends.
//!
//! ## Rules
//! - Only the backlog is touched. The in-flight operation is never evicted, so
//!   a key can have `capacity + 1` operations outstanding (waiting + running).
//! - Eviction is silent for the caller: the evicted operation never runs.
//!
//! ```text
//! capacity = 2, key busy with op1
//!
//! push(op2)  pending: [op2]
//! push(op3)  pending: [op2, op3]
//! push(op4)  pending: [op3, op4]   ← op2 evicted
//! ```

use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Policy controlling the size of each key's backlog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Keep every pending operation.
    #[default]
    Unbounded,

    /// Keep at most `capacity` pending operations, discarding the oldest first.
    DropOldest {
        /// Maximum backlog length per key (the running operation is not counted).
        capacity: NonZeroUsize,
    },
}

impl EvictionPolicy {
    /// Bounded policy; `None` when `capacity == 0`.
    pub fn drop_oldest(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(|capacity| Self::DropOldest { capacity })
    }

    /// Returns the backlog capacity (`None` = unbounded).
    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::DropOldest { capacity } => Some(capacity.get()),
        }
    }

    /// Appends `item` to `pending`, evicting the oldest entry first if the
    /// backlog is already at capacity.
    ///
    /// Returns the evicted entry, if any.
    pub fn admit<T>(&self, pending: &mut VecDeque<T>, item: T) -> Option<T> {
        let evicted = match self.capacity() {
            Some(cap) if pending.len() >= cap => pending.pop_front(),
            _ => None,
        };
        pending.push_back(item);
        evicted
    }
}
