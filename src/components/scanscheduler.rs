//! Repeating scan timer.
//!
//! Accumulates frame time while active and reports when a scan is due. The
//! timer resets by subtracting the interval, but any backlog beyond one
//! interval is dropped so a single frame never runs more than one scan.
//! Activation and deactivation are idempotent; deactivating never touches
//! the focus state.

use crate::components::scanconfig::MIN_INTERVAL;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanScheduler {
    interval: f32,
    elapsed: f32,
    active: bool,
}

impl ScanScheduler {
    pub fn new(interval: f32) -> Self {
        ScanScheduler {
            interval: interval.max(MIN_INTERVAL),
            elapsed: 0.0,
            active: false,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start the timer. Returns `false` if it was already running.
    pub fn activate(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.elapsed = 0.0;
        true
    }

    /// Stop the timer. Returns `false` if it was not running.
    pub fn deactivate(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.elapsed = 0.0;
        true
    }

    /// Advance by `delta` seconds. Returns `true` when a scan is due.
    pub fn tick(&mut self, delta: f32) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed += delta.max(0.0);
        if self.elapsed < self.interval {
            return false;
        }
        // Remainder stays strictly below the interval at any magnitude.
        self.elapsed = ((self.elapsed - self.interval) % self.interval).max(0.0);
        true
    }
}
