//! Wall-clock pacing for the realtime driver.

use std::time::{Duration, Instant};

/// Gates ticks on elapsed time.
///
/// A tick is due once more than the base interval, divided by the current
/// time scale, has passed since the previous tick. A scale below 1.0 slows
/// the universe down.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    base_interval: Duration,
    last_update: Option<Instant>,
}

impl SimulationClock {
    #[must_use]
    pub fn new(base_interval: Duration) -> Self {
        Self {
            base_interval,
            last_update: None,
        }
    }

    #[must_use]
    pub fn base_interval(&self) -> Duration {
        self.base_interval
    }

    /// Interval between ticks under `time_scale`.
    #[must_use]
    pub fn effective_interval(&self, time_scale: f64) -> Duration {
        if time_scale > 0.0 && time_scale.is_finite() {
            self.base_interval.div_f64(time_scale)
        } else {
            self.base_interval
        }
    }

    /// Returns true and restarts the interval when a tick is due at `now`.
    /// The first call is always due.
    pub fn should_tick(&mut self, now: Instant, time_scale: f64) -> bool {
        let due = match self.last_update {
            Some(last) => now.saturating_duration_since(last) > self.effective_interval(time_scale),
            None => true,
        };
        if due {
            self.last_update = Some(now);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_update = None;
    }
}
