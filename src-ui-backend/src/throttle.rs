//! Leading-edge throttle for propagating drag updates.
//!
//! The first change of a burst goes through immediately and opens a window of
//! `interval`. Changes inside the window are dropped, not queued. The first
//! change after the window has elapsed goes through and opens the next one.

use std::time::{Duration, Instant};

/// Minimum time between two propagated updates during a drag
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct UpdateThrottle {
    interval: Duration,
    window_start: Option<Instant>,
}

impl Default for UpdateThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}

impl UpdateThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when a change at `now` may be propagated, and opens a new
    /// window in that case.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if self.is_suppressing(now) {
            return false;
        }
        self.window_start = Some(now);
        true
    }

    /// True while a window opened by a propagated change is still running.
    pub fn is_suppressing(&self, now: Instant) -> bool {
        match self.window_start {
            Some(start) => now.saturating_duration_since(start) < self.interval,
            None => false,
        }
    }

    /// Forget the current window; the next change propagates immediately.
    pub fn reset(&mut self) {
        self.window_start = None;
    }
}
