//! Round timer
//!
//! Advisory only: the clock is driven by the front end and never gates
//! match resolution.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClock {
    elapsed: Duration,
    running: bool,
}

impl RoundClock {
    /// Zero the clock and start it
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn stop(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `dt` if running
    pub fn tick(&mut self, dt: Duration) {
        if self.running {
            self.elapsed = self.elapsed.saturating_add(dt);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.as_secs()
    }
}
