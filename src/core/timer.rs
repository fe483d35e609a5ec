// Author: Dustin Pilgrim
// License: MIT

use crate::core::clock::Clock;
use crate::core::error::Error;
use crate::core::events::HostEvent;
use crate::core::format::format_time;
use crate::core::project::PrefKeys;
use crate::core::store::{PrefStore, PrefWrite};
use crate::core::subscriptions::Subscriptions;
use crate::{sdebug, sinfo, swarn};

/// What a dispatched notification did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No handler was subscribed for the notification.
    NotSubscribed,
    /// The handler fired while the timer was disabled.
    Inactive,
    /// No start timestamp was recorded for this cycle.
    NotStarted,
    Started { at: f64 },
    CompileMeasured { compile_delta: f64 },
    Completed(IdleCycle),
}

/// A finished start -> reload cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct IdleCycle {
    pub idle_delta: f64,
    pub compile_delta: f64,
    pub overall: f64,
}

impl IdleCycle {
    pub fn summary(&self, project: &str) -> String {
        format!(
            "Your idle time was {} (compile time: {}). Your overall idle time on '{}' is {}",
            format_time(self.idle_delta),
            format_time(self.compile_delta),
            project,
            format_time(self.overall),
        )
    }
}

/// Point-in-time view of the timer, used by `info`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerInfo {
    pub project: String,
    pub active: bool,
    pub armed: Vec<HostEvent>,
    pub pending_start: Option<f64>,
    pub last_compile: Option<f64>,
    pub overall: f64,
    pub now: f64,
}

/// Observes compile/reload notifications and tallies the time spent waiting.
pub struct IdleTimer<C: Clock, S: PrefStore> {
    clock: C,
    store: S,
    keys: PrefKeys,
    active: bool,
    subs: Subscriptions,
}

impl<C: Clock, S: PrefStore> IdleTimer<C, S> {
    /// Builds the timer and performs the first initialisation.
    /// The active flag comes from the store and defaults to enabled.
    pub fn new(clock: C, store: S, keys: PrefKeys) -> Self {
        let active = store.get_bool(&keys.active, true);
        let mut timer = Self {
            clock,
            store,
            keys,
            active,
            subs: Subscriptions::default(),
        };
        timer.initialize();
        timer
    }

    /// Host (re)initialisation: subscribe every handler, unless disabled.
    pub fn initialize(&mut self) {
        if !self.active {
            sdebug!("IdleTimer", "timer disabled, not subscribing");
            return;
        }
        self.subs.arm_all();
    }

    pub fn keys(&self) -> &PrefKeys {
        &self.keys
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub fn is_subscribed(&self, event: HostEvent) -> bool {
        self.subs.is_armed(event)
    }

    #[cfg(test)]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Routes a notification to its handler if one is subscribed.
    pub fn dispatch(&mut self, event: HostEvent) -> Result<Outcome, Error> {
        if !self.subs.is_armed(event) {
            sdebug!("IdleTimer", "{} ignored, no subscription", event);
            return Ok(Outcome::NotSubscribed);
        }

        match event {
            HostEvent::CompilationStarted => self.on_compilation_started(),
            HostEvent::CompilationFinished => self.on_compilation_finished(),
            HostEvent::ReloadFinished => self.on_reload_finished(),
        }
    }

    pub fn on_compilation_started(&mut self) -> Result<Outcome, Error> {
        self.subs.unsubscribe(HostEvent::CompilationStarted);
        if !self.active {
            return Ok(Outcome::Inactive);
        }

        let now = self.clock.now_secs();
        self.store.set_float(&self.keys.last_idle_start_time, now)?;
        sdebug!("IdleTimer", "compilation started at {:.3}s", now);

        Ok(Outcome::Started { at: now })
    }

    pub fn on_compilation_finished(&mut self) -> Result<Outcome, Error> {
        self.subs.unsubscribe(HostEvent::CompilationFinished);
        if !self.active {
            return Ok(Outcome::Inactive);
        }

        let Some(start) = self.pending_start() else {
            return Ok(Outcome::NotStarted);
        };

        let compile_delta = self.clock.now_secs() - start;
        if compile_delta < 0.0 {
            return self.discard_stale_start(start);
        }

        self.store.set_float(&self.keys.last_compile_idle_time, compile_delta)?;
        sdebug!("IdleTimer", "compilation took {}", format_time(compile_delta));

        Ok(Outcome::CompileMeasured { compile_delta })
    }

    pub fn on_reload_finished(&mut self) -> Result<Outcome, Error> {
        self.subs.unsubscribe(HostEvent::ReloadFinished);
        if !self.active {
            return Ok(Outcome::Inactive);
        }

        let Some(start) = self.pending_start() else {
            return Ok(Outcome::NotStarted);
        };
        let compile_delta = self.store.get_float(&self.keys.last_compile_idle_time);

        let idle_delta = self.clock.now_secs() - start;
        if idle_delta < 0.0 {
            return self.discard_stale_start(start);
        }

        let overall = self.store.get_float(&self.keys.overall_idle_time) + idle_delta;
        let cycle = IdleCycle {
            idle_delta,
            compile_delta,
            overall,
        };

        // The total and the consumed start land together, or the cycle stays pending.
        self.store.apply(&[
            PrefWrite::Float(&self.keys.overall_idle_time, overall),
            PrefWrite::Delete(&self.keys.last_idle_start_time),
            PrefWrite::Delete(&self.keys.last_compile_idle_time),
        ])?;

        sinfo!("IdleTimer", "{}", cycle.summary(&self.keys.project));

        Ok(Outcome::Completed(cycle))
    }

    /// Removes every idle key of the current project, overall total included.
    pub fn clear(&mut self) -> Result<(), Error> {
        let writes = self.keys.idle_keys().map(PrefWrite::Delete);
        self.store.apply(&writes)?;
        sinfo!("IdleTimer", "cleared idle times for '{}'", self.keys.project);
        Ok(())
    }

    /// Flips the active flag and persists it. Subscriptions are not touched;
    /// a re-enabled timer starts listening at the next initialisation.
    pub fn toggle(&mut self) -> Result<bool, Error> {
        self.active = !self.active;
        self.store.set_bool(&self.keys.active, self.active)?;
        sinfo!(
            "IdleTimer",
            "idle timer {}",
            if self.active { "enabled" } else { "disabled" }
        );
        Ok(self.active)
    }

    /// Drops a start/compile pair left behind by an earlier process, whose
    /// clock readings mean nothing to this one. Returns whether one existed.
    pub fn drop_unfinished_cycle(&mut self) -> Result<bool, Error> {
        let had_start = self.store.has_key(&self.keys.last_idle_start_time);
        let had_compile = self.store.has_key(&self.keys.last_compile_idle_time);

        self.forget_pending()?;

        Ok(had_start || had_compile)
    }

    pub fn info(&self) -> TimerInfo {
        let last_compile = self
            .store
            .has_key(&self.keys.last_compile_idle_time)
            .then(|| self.store.get_float(&self.keys.last_compile_idle_time));

        TimerInfo {
            project: self.keys.project.clone(),
            active: self.active,
            armed: self.subs.armed(),
            pending_start: self.pending_start(),
            last_compile,
            overall: self.store.get_float(&self.keys.overall_idle_time),
            now: self.clock.now_secs(),
        }
    }

    // A missing key means no compilation started in this cycle. A present
    // key holding 0.0 is a real timestamp taken right at startup.
    fn pending_start(&self) -> Option<f64> {
        self.store
            .has_key(&self.keys.last_idle_start_time)
            .then(|| self.store.get_float(&self.keys.last_idle_start_time))
    }

    // A start later than "now" was written by an earlier process; counting it
    // would make the overall total shrink.
    fn discard_stale_start(&mut self, start: f64) -> Result<Outcome, Error> {
        swarn!(
            "IdleTimer",
            "discarding stale start timestamp {:.3}s from a previous run",
            start
        );
        self.forget_pending()?;
        Ok(Outcome::NotStarted)
    }

    fn forget_pending(&mut self) -> Result<(), Error> {
        self.store.apply(&[
            PrefWrite::Delete(&self.keys.last_idle_start_time),
            PrefWrite::Delete(&self.keys.last_compile_idle_time),
        ])?;
        Ok(())
    }
}
