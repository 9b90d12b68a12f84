//! Virtual-time scheduler
//!
//! Time only moves when [`VirtualScheduler::advance`] is called, which makes
//! delayed behavior testable without wall-clock waits.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

use super::{Scheduler, TimerId};

/// Scheduler driven by explicit calls to [`advance`](Self::advance)
#[derive(Debug)]
pub struct VirtualScheduler<E> {
    /// Wall-clock instant corresponding to virtual time zero
    origin: DateTime<Utc>,
    /// Elapsed virtual time
    elapsed: Duration,
    /// Pending timers ordered by (deadline, id); ids increase with scheduling order
    timers: BTreeMap<(Duration, TimerId), E>,
    next_id: u64,
}

impl<E> VirtualScheduler<E> {
    /// Create a scheduler starting at the given instant
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            elapsed: Duration::ZERO,
            timers: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create a scheduler starting at the Unix epoch
    pub fn new() -> Self {
        Self::starting_at(Utc.timestamp_millis_opt(0).single().unwrap_or_else(Utc::now))
    }

    /// Elapsed virtual time since creation
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Move time forward and return the events that fired, in deadline order
    ///
    /// Timers sharing a deadline fire in the order they were scheduled.
    pub fn advance(&mut self, by: Duration) -> Vec<E> {
        self.elapsed = self.elapsed.saturating_add(by);

        let still_pending = match self.elapsed.checked_add(Duration::from_nanos(1)) {
            Some(cutoff) => self.timers.split_off(&(cutoff, TimerId(0))),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.timers, still_pending);

        due.into_values().collect()
    }

    /// Fire every pending timer, moving time to the last deadline
    pub fn run_until_idle(&mut self) -> Vec<E> {
        match self.timers.keys().next_back() {
            Some((deadline, _)) => {
                let remaining = deadline.saturating_sub(self.elapsed);
                self.advance(remaining)
            }
            None => Vec::new(),
        }
    }

    /// Time until the next timer fires
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers
            .keys()
            .next()
            .map(|(deadline, _)| deadline.saturating_sub(self.elapsed))
    }
}

impl<E> Default for VirtualScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> for VirtualScheduler<E> {
    fn now(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.elapsed)
            .ok()
            .and_then(|offset| self.origin.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert((self.elapsed.saturating_add(delay), id), event);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.timers.keys().find(|(_, timer)| *timer == id).copied();
        match key {
            Some(key) => self.timers.remove(&key).is_some(),
            None => false,
        }
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_fires_early() {
        let mut sched = VirtualScheduler::new();
        sched.schedule(Duration::from_millis(1000), "reply");

        assert!(sched.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.advance(Duration::from_millis(1)), vec!["reply"]);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_deadline_order_and_ties() {
        let mut sched = VirtualScheduler::new();
        sched.schedule(Duration::from_millis(2000), "navigate");
        sched.schedule(Duration::from_millis(500), "first");
        sched.schedule(Duration::from_millis(500), "second");

        let fired = sched.advance(Duration::from_secs(5));
        assert_eq!(fired, vec!["first", "second", "navigate"]);
    }

    #[test]
    fn test_cancel() {
        let mut sched = VirtualScheduler::new();
        let keep = sched.schedule(Duration::from_millis(100), 1);
        let dropped = sched.schedule(Duration::from_millis(100), 2);

        assert!(sched.cancel(dropped));
        assert!(!sched.cancel(dropped));
        assert_eq!(sched.advance(Duration::from_millis(100)), vec![1]);
        assert!(!sched.cancel(keep));
    }

    #[test]
    fn test_now_tracks_virtual_time() {
        let origin = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut sched: VirtualScheduler<()> = VirtualScheduler::starting_at(origin);

        sched.advance(Duration::from_secs(90));
        assert_eq!(sched.now(), origin + chrono::Duration::seconds(90));
        assert_eq!(sched.elapsed(), Duration::from_secs(90));
    }

    #[test]
    fn test_huge_advance_saturates() {
        let mut sched = VirtualScheduler::new();
        sched.schedule(Duration::from_secs(1), "soon");
        sched.schedule(Duration::MAX, "never");

        assert_eq!(sched.advance(Duration::MAX), vec!["soon", "never"]);
        assert_eq!(sched.elapsed(), Duration::MAX);
        assert!(sched.advance(Duration::MAX).is_empty());
        assert_eq!(sched.now(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_run_until_idle() {
        let mut sched = VirtualScheduler::new();
        sched.schedule(Duration::from_millis(300), 'a');
        sched.schedule(Duration::from_millis(2000), 'b');

        assert_eq!(sched.next_deadline(), Some(Duration::from_millis(300)));
        assert_eq!(sched.run_until_idle(), vec!['a', 'b']);
        assert_eq!(sched.elapsed(), Duration::from_millis(2000));
        assert_eq!(sched.next_deadline(), None);
    }
}
