//! Tokio-backed scheduler
//!
//! Every timer is a spawned task that sleeps and then sends its event on an
//! unbounded channel. The receiving half is returned from
//! [`TokioScheduler::new`] and is usually polled in a `select!` loop next to
//! the input source.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Scheduler, TimerId};

/// Real-time scheduler; must be used inside a tokio runtime
pub struct TokioScheduler<E> {
    sender: mpsc::UnboundedSender<E>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
    next_id: u64,
}

impl<E: Send + 'static> TokioScheduler<E> {
    /// Create a scheduler and the receiver its timers deliver to
    pub fn new() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            sender,
            tasks: HashMap::new(),
            next_id: 1,
        };
        (scheduler, receiver)
    }

    fn reap_finished(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }
}

impl<E> TokioScheduler<E> {
    /// Abort every pending timer
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl<E: Send + 'static> Scheduler<E> for TokioScheduler<E> {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        self.reap_finished();

        let id = TimerId(self.next_id);
        self.next_id += 1;

        let sender = self.sender.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(event).is_err() {
                tracing::debug!(timer = %id, "Timer fired after receiver was dropped");
            }
        });

        self.tasks.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.tasks.remove(&id) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    fn pending(&self) -> usize {
        self.tasks.values().filter(|h| !h.is_finished()).count()
    }
}

impl<E> Drop for TokioScheduler<E> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timer_delivers_event() {
        let (mut sched, mut rx) = TokioScheduler::new();
        sched.schedule(Duration::from_millis(1000), "reply");

        let event = rx.recv().await;
        assert_eq!(event, Some("reply"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_fire_in_deadline_order() {
        let (mut sched, mut rx) = TokioScheduler::new();
        sched.schedule(Duration::from_millis(2000), "navigate");
        sched.schedule(Duration::from_millis(500), "autosend");

        assert_eq!(rx.recv().await, Some("autosend"));
        assert_eq!(rx.recv().await, Some("navigate"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_delivery() {
        let (mut sched, mut rx) = TokioScheduler::new();
        let cancelled = sched.schedule(Duration::from_millis(100), 1);
        sched.schedule(Duration::from_millis(200), 2);

        assert!(sched.cancel(cancelled));
        assert_eq!(rx.recv().await, Some(2));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all() {
        let (mut sched, mut rx) = TokioScheduler::new();
        let first = sched.schedule(Duration::from_millis(500), "autosend");
        sched.schedule(Duration::from_millis(2000), "navigate");

        sched.cancel_all();
        assert_eq!(sched.pending(), 0);
        assert!(!sched.cancel(first));

        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(rx.try_recv().is_err());
    }
}
