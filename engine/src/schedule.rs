use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Result of a single game step: keep the frame loop going, or stop rescheduling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tick {
    Continue,
    Halt,
}

impl Tick {
    pub fn is_continue(self) -> bool {
        matches!(self, Tick::Continue)
    }
}

/// Fixed-cadence frame pacing for windowed drivers.
///
/// The clock is either stopped (no frames due, ever) or running with a single pending deadline.
/// Stopping is how a halted game leaves the loop idle until input restarts it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    next_due: Option<Instant>,
}

impl FrameClock {
    pub const DEFAULT_HZ: f64 = 60.0;

    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_micros(1)),
            next_due: None,
        }
    }

    pub fn from_hz(hz: f64) -> Self {
        let hz = if hz.is_finite() && hz > 0.0 {
            hz
        } else {
            Self::DEFAULT_HZ
        };
        Self::new(Duration::from_secs_f64(1.0 / hz))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Starts the clock with a frame due immediately. No-op if already running.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Returns true if a frame is due at `now` and schedules the following one.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        // Don't try to catch up on missed frames after a stall.
        let mut next = due + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_due = Some(next);
        true
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::from_hz(Self::DEFAULT_HZ)
    }
}
