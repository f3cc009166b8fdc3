//! # Event subscribers for the keyqueue dispatcher.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out
//! used to deliver runtime events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Dispatcher / launcher ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                                    │
//!                                                       ┌────────────┼────────────┐
//!                                                       ▼            ▼            ▼
//!                                                   LogWriter     Metrics      Custom
//! ```

mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
mod embedded;

pub use subscribe::Subscribe;
pub(crate) use subscriber_set::SubscriberSet;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
