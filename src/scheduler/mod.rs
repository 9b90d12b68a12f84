//! Timer scheduling
//!
//! The assistant's simulated delays ("thinking" before a chat reply, the
//! voice auto-send pause, the navigation delay after a command) are timers
//! on a [`Scheduler`]. Two implementations are provided:
//!
//! - [`VirtualScheduler`]: manual virtual time, advanced by the caller
//! - [`TokioScheduler`]: real timers delivering events over an mpsc channel
//!
//! Timers carry an arbitrary event payload. A scheduler never interprets
//! the payload; firing a timer only hands the event back to the caller.

mod tokio_timer;
mod virtual_clock;

pub use tokio_timer::TokioScheduler;
pub use virtual_clock::VirtualScheduler;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Source of time and one-shot timers
pub trait Scheduler<E> {
    /// Current time as seen by this scheduler
    fn now(&self) -> DateTime<Utc>;

    /// Deliver `event` once `delay` has elapsed
    fn schedule(&mut self, delay: Duration, event: E) -> TimerId;

    /// Cancel a pending timer; returns false if it already fired or never existed
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Number of timers that have not fired yet
    fn pending(&self) -> usize;
}
