//! Repeating tick timer
//!
//! An explicit repeating-timer abstraction with a start/stop lifecycle,
//! decoupled from any UI toolkit's scheduling primitive. The host loop asks
//! `due(now)` whether a tick should run and sleeps until `next_deadline`.
//! Clearing the running flag makes the host loop exit instead of
//! rescheduling; a tick already in progress always runs to completion.

use std::time::{Duration, Instant};

/// Default tick interval (~30 Hz)
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(33);

/// A cooperatively driven repeating timer
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    running: bool,
    next_deadline: Instant,
}

impl TickTimer {
    /// Create a stopped timer with the given interval
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            running: false,
            next_deadline: now,
        }
    }

    /// Start the timer; the first tick is due immediately
    pub fn start(&mut self, now: Instant) {
        if self.running {
            return;
        }
        self.running = true;
        self.next_deadline = now;
    }

    /// Stop the timer. Does not interrupt a tick in progress.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the timer is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The tick interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick is due
    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Whether a tick is due at `now`.
    ///
    /// On a due tick the deadline advances past `now` in whole intervals,
    /// so a stalled host skips missed ticks instead of bursting to catch up.
    pub fn due(&mut self, now: Instant) -> bool {
        if !self.running || now < self.next_deadline {
            return false;
        }
        while self.next_deadline <= now {
            self.next_deadline += self.interval;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_when_stopped() {
        let now = Instant::now();
        let mut timer = TickTimer::new(DEFAULT_TICK_INTERVAL, now);
        assert!(!timer.due(now));
    }

    #[test]
    fn test_first_tick_due_on_start() {
        let now = Instant::now();
        let mut timer = TickTimer::new(DEFAULT_TICK_INTERVAL, now);
        timer.start(now);
        assert!(timer.due(now));
        // Immediately after, the next tick is one interval away
        assert!(!timer.due(now));
        assert_eq!(timer.next_deadline(), now + DEFAULT_TICK_INTERVAL);
    }

    #[test]
    fn test_periodic_ticks() {
        let now = Instant::now();
        let mut timer = TickTimer::new(Duration::from_millis(10), now);
        timer.start(now);
        assert!(timer.due(now));
        assert!(!timer.due(now + Duration::from_millis(5)));
        assert!(timer.due(now + Duration::from_millis(10)));
    }

    #[test]
    fn test_missed_ticks_are_skipped() {
        let now = Instant::now();
        let mut timer = TickTimer::new(Duration::from_millis(10), now);
        timer.start(now);
        assert!(timer.due(now));

        // Host stalled for five intervals: one tick, not five
        let late = now + Duration::from_millis(52);
        assert!(timer.due(late));
        assert!(!timer.due(late));
        assert!(timer.next_deadline() > late);
    }

    #[test]
    fn test_stop_clears_running() {
        let now = Instant::now();
        let mut timer = TickTimer::new(DEFAULT_TICK_INTERVAL, now);
        timer.start(now);
        timer.stop();
        assert!(!timer.is_running());
        assert!(!timer.due(now + DEFAULT_TICK_INTERVAL));
    }

    #[test]
    fn test_start_twice_is_noop() {
        let now = Instant::now();
        let mut timer = TickTimer::new(DEFAULT_TICK_INTERVAL, now);
        timer.start(now);
        assert!(timer.due(now));
        timer.start(now + Duration::from_millis(1));
        // A second start must not reset the deadline
        assert!(!timer.due(now + Duration::from_millis(1)));
    }
}
