// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use std::cell::Cell;
use std::time::Instant;

/// Source of "seconds since startup" readings for the idle timer.
pub trait Clock: Send {
    fn now_secs(&self) -> f64;
}

/// Seconds elapsed since this clock was created (the daemon's startup).
#[derive(Debug)]
pub struct StartupClock {
    started: Instant,
}

impl StartupClock {
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }
}

impl Default for StartupClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StartupClock {
    fn now_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

#[cfg(test)]
impl ManualClock {
    pub fn at(secs: f64) -> Self {
        Self { now: Cell::new(secs) }
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}
