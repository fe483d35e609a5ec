// Author: Dustin Pilgrim
// License: MIT

mod run;

use crate::core::{
    clock::Clock,
    daemon_msg::DaemonMsg,
    events::HostEvent,
    format::format_time,
    info::checkmark,
    store::PrefStore,
    timer::{IdleTimer, Outcome},
};
use crate::{sdebug, serror, sinfo, swarn};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// Plays the host process: owns the timer and serialises every
/// notification and action through one message loop.
pub struct Daemon<C: Clock, S: PrefStore> {
    timer: IdleTimer<C, S>,
}

impl<C: Clock, S: PrefStore> Daemon<C, S> {
    pub fn new(mut timer: IdleTimer<C, S>) -> Self {
        match timer.drop_unfinished_cycle() {
            Ok(true) => swarn!(
                "Daemon",
                "dropped an unfinished idle cycle left by a previous run"
            ),
            Ok(false) => {}
            Err(e) => serror!("Daemon", "failed to reset unfinished cycle: {}", e),
        }

        sinfo!(
            "Daemon",
            "tracking project '{}' ({})",
            timer.keys().project,
            checkmark(timer.is_active())
        );

        Self { timer }
    }

    /// Handles one message. Returns `false` once the daemon should stop.
    pub fn handle_msg(&mut self, msg: DaemonMsg) -> bool {
        match msg {
            DaemonMsg::Notify { event, reply } => {
                let out = self.notify(event);
                let _ = reply.send(out);
            }

            DaemonMsg::Clear { reply } => {
                let out = self
                    .timer
                    .clear()
                    .map(|_| format!("Cleared idle times for '{}'", self.timer.keys().project))
                    .map_err(|e| e.to_string());
                let _ = reply.send(out);
            }

            DaemonMsg::Toggle { reply } => {
                let out = self
                    .timer
                    .toggle()
                    .map(|active| checkmark(active).to_string())
                    .map_err(|e| e.to_string());
                let _ = reply.send(out);
            }

            DaemonMsg::GetInfo { reply } => {
                let _ = reply.send(self.timer.info());
            }

            DaemonMsg::StopDaemon { reply } => {
                sinfo!("Daemon", "daemon stopping (stop requested via IPC)");
                let _ = reply.send(Ok("Stopping idletally daemon".to_string()));
                return false;
            }
        }

        true
    }

    fn notify(&mut self, event: HostEvent) -> Result<String, String> {
        sdebug!("Daemon", "incoming: {}", event);

        let res = self.timer.dispatch(event);

        // A finished reload is a host reinitialisation: handlers subscribe again.
        if event == HostEvent::ReloadFinished {
            self.timer.initialize();
        }

        match res {
            Ok(outcome) => Ok(self.describe(event, outcome)),
            Err(e) => {
                serror!("Daemon", "{} failed: {}", event, e);
                Err(e.to_string())
            }
        }
    }

    fn describe(&self, event: HostEvent, outcome: Outcome) -> String {
        match outcome {
            Outcome::NotSubscribed => format!("Not subscribed to {event}; ignored"),
            Outcome::Inactive => "Idle timer disabled; ignored".to_string(),
            Outcome::NotStarted => "No compilation start recorded; nothing to do".to_string(),
            Outcome::Started { at } => format!("Compilation started at {at:.2}s"),
            Outcome::CompileMeasured { compile_delta } => {
                format!("Compilation took {}", format_time(compile_delta))
            }
            Outcome::Completed(cycle) => cycle.summary(&self.timer.keys().project),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::project::PrefKeys;
    use crate::core::store::{JsonFileStore, MemoryStore};
    use tokio::sync::oneshot;

    fn daemon() -> Daemon<ManualClock, MemoryStore> {
        Daemon::new(IdleTimer::new(
            ManualClock::at(1.0),
            MemoryStore::new(),
            PrefKeys::for_project("Game"),
        ))
    }

    fn notify(d: &mut Daemon<ManualClock, MemoryStore>, event: HostEvent) -> String {
        let (reply, mut rx) = oneshot::channel();
        assert!(d.handle_msg(DaemonMsg::Notify { event, reply }));
        rx.try_recv().unwrap().unwrap()
    }

    #[test]
    fn full_cycle_replies_with_summary() {
        let mut d = daemon();

        assert_eq!(notify(&mut d, HostEvent::CompilationStarted), "Compilation started at 1.00s");
        d.timer.clock().advance(2.0);
        assert_eq!(
            notify(&mut d, HostEvent::CompilationFinished),
            "Compilation took 02.00 [s]"
        );
        d.timer.clock().advance(3.0);

        let summary = notify(&mut d, HostEvent::ReloadFinished);
        assert!(summary.contains("05.00 [s]"), "{summary}");
        assert!(summary.contains("02.00 [s]"), "{summary}");
    }

    #[test]
    fn reload_reinitialises_subscriptions() {
        let mut d = daemon();

        notify(&mut d, HostEvent::CompilationStarted);
        assert_eq!(
            notify(&mut d, HostEvent::CompilationStarted),
            "Not subscribed to compilation-started; ignored"
        );

        // the reload completes the cycle and re-arms every handler
        notify(&mut d, HostEvent::ReloadFinished);
        assert_eq!(notify(&mut d, HostEvent::CompilationStarted), "Compilation started at 1.00s");
    }

    #[test]
    fn reload_without_start_is_a_no_op() {
        let mut d = daemon();
        assert_eq!(
            notify(&mut d, HostEvent::ReloadFinished),
            "No compilation start recorded; nothing to do"
        );
    }

    #[test]
    fn toggle_and_clear_replies() {
        let mut d = daemon();

        let (reply, mut rx) = oneshot::channel();
        d.handle_msg(DaemonMsg::Toggle { reply });
        assert_eq!(rx.try_recv().unwrap().unwrap(), "[ ] enabled");

        let (reply, mut rx) = oneshot::channel();
        d.handle_msg(DaemonMsg::Toggle { reply });
        assert_eq!(rx.try_recv().unwrap().unwrap(), "[x] enabled");

        let (reply, mut rx) = oneshot::channel();
        d.handle_msg(DaemonMsg::Clear { reply });
        assert_eq!(rx.try_recv().unwrap().unwrap(), "Cleared idle times for 'Game'");
    }

    #[test]
    fn stop_ends_the_loop() {
        let mut d = daemon();
        let (reply, mut rx) = oneshot::channel();
        assert!(!d.handle_msg(DaemonMsg::StopDaemon { reply }));
        assert_eq!(rx.try_recv().unwrap().unwrap(), "Stopping idletally daemon");
    }

    #[test]
    fn leftover_start_is_dropped_at_startup() {
        let mut store = MemoryStore::new();
        store.set_float("Game_LastIdleStartTime", 0.5).unwrap();

        let d = Daemon::new(IdleTimer::new(
            ManualClock::at(100.0),
            store,
            PrefKeys::for_project("Game"),
        ));
        assert_eq!(d.timer.info().pending_start, None);
    }

    #[test]
    fn failed_store_write_is_reported_and_cycle_stays_pending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let mut d = Daemon::new(IdleTimer::new(
            ManualClock::at(0.0),
            JsonFileStore::open(&path).unwrap(),
            PrefKeys::for_project("Game"),
        ));

        let (reply, mut rx) = oneshot::channel();
        d.handle_msg(DaemonMsg::Notify { event: HostEvent::CompilationStarted, reply });
        assert!(rx.try_recv().unwrap().is_ok());

        std::fs::create_dir(dir.path().join("prefs.json.tmp")).unwrap();

        let (reply, mut rx) = oneshot::channel();
        assert!(d.handle_msg(DaemonMsg::Notify { event: HostEvent::ReloadFinished, reply }));
        let err = rx.try_recv().unwrap().unwrap_err();
        assert!(err.starts_with("preference store I/O error"), "{err}");

        let info = d.timer.info();
        assert_eq!(info.pending_start, Some(0.0));
        assert_eq!(info.overall, 0.0);
    }
}
