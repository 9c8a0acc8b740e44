//! Rolling one-second rate metrics

use std::time::{Duration, Instant};

/// Counts events and reports a per-second rate over a rolling window.
///
/// Used for both the tick rate (FPS) and the inbound message rate. The
/// window closes once at least one second has elapsed; the rate is the
/// count divided by the actual elapsed time, so a late roll stays accurate.
#[derive(Debug, Clone)]
pub struct RateCounter {
    window: Duration,
    count: u32,
    window_start: Instant,
    rate: f32,
}

impl RateCounter {
    /// Create a counter with a one-second window
    pub fn new(now: Instant) -> Self {
        Self {
            window: Duration::from_secs(1),
            count: 0,
            window_start: now,
            rate: 0.0,
        }
    }

    /// Record one event
    pub fn record(&mut self) {
        self.count += 1;
    }

    /// Close the window if it has elapsed, updating the reported rate
    pub fn roll(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= self.window {
            self.rate = self.count as f32 / elapsed.as_secs_f32();
            self.count = 0;
            self.window_start = now;
        }
    }

    /// The most recently computed per-second rate
    pub fn rate(&self) -> f32 {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_zero_before_first_window() {
        let start = Instant::now();
        let mut counter = RateCounter::new(start);
        counter.record();
        counter.roll(start + Duration::from_millis(500));
        assert_eq!(counter.rate(), 0.0);
    }

    #[test]
    fn test_rate_after_window_closes() {
        let start = Instant::now();
        let mut counter = RateCounter::new(start);
        for _ in 0..30 {
            counter.record();
        }
        counter.roll(start + Duration::from_secs(1));
        assert!((counter.rate() - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_count_resets_each_window() {
        let start = Instant::now();
        let mut counter = RateCounter::new(start);
        for _ in 0..60 {
            counter.record();
        }
        counter.roll(start + Duration::from_secs(1));

        // Nothing recorded in the second window
        counter.roll(start + Duration::from_secs(2));
        assert_eq!(counter.rate(), 0.0);
    }

    #[test]
    fn test_late_roll_uses_actual_elapsed() {
        let start = Instant::now();
        let mut counter = RateCounter::new(start);
        for _ in 0..100 {
            counter.record();
        }
        counter.roll(start + Duration::from_secs(2));
        assert!((counter.rate() - 50.0).abs() < 0.5);
    }
}
