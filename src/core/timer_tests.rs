// Author: Dustin Pilgrim
// License: MIT

use crate::core::clock::ManualClock;
use crate::core::events::HostEvent;
use crate::core::project::PrefKeys;
use crate::core::store::{JsonFileStore, MemoryStore, PrefStore};
use crate::core::timer::{IdleCycle, IdleTimer, Outcome};

fn timer_at(secs: f64) -> IdleTimer<ManualClock, MemoryStore> {
    IdleTimer::new(
        ManualClock::at(secs),
        MemoryStore::new(),
        PrefKeys::for_project("Game"),
    )
}

fn run_cycle(
    timer: &mut IdleTimer<ManualClock, MemoryStore>,
    compile: f64,
    reload: f64,
) -> IdleCycle {
    timer.dispatch(HostEvent::CompilationStarted).unwrap();
    timer.clock().advance(compile);
    timer.dispatch(HostEvent::CompilationFinished).unwrap();
    timer.clock().advance(reload);

    let outcome = timer.dispatch(HostEvent::ReloadFinished).unwrap();
    timer.initialize();

    match outcome {
        Outcome::Completed(cycle) => cycle,
        other => panic!("expected a completed cycle, got {other:?}"),
    }
}

#[test]
fn start_at_zero_finish_and_reload_at_five() {
    let mut timer = timer_at(0.0);

    assert_eq!(
        timer.dispatch(HostEvent::CompilationStarted).unwrap(),
        Outcome::Started { at: 0.0 }
    );

    timer.clock().set(5.0);
    assert_eq!(
        timer.dispatch(HostEvent::CompilationFinished).unwrap(),
        Outcome::CompileMeasured { compile_delta: 5.0 }
    );

    let Outcome::Completed(cycle) = timer.dispatch(HostEvent::ReloadFinished).unwrap() else {
        panic!("reload should complete the cycle");
    };
    assert_eq!(cycle.idle_delta, 5.0);
    assert_eq!(cycle.compile_delta, 5.0);
    assert_eq!(cycle.overall, 5.0);
    assert!(cycle.summary("Game").contains("05.00 [s]"));

    let store = timer.store();
    assert_eq!(store.get_float("Game_OverallIdleTime"), 5.0);
    assert!(!store.has_key("Game_LastIdleStartTime"));
    assert!(!store.has_key("Game_LastCompileIdleTime"));
}

#[test]
fn overall_is_the_sum_of_idle_deltas() {
    let mut timer = timer_at(10.0);
    let deltas = [(1.5, 0.5), (30.0, 12.25), (0.0, 3.0), (100.0, 20.0)];

    let mut expected = 0.0;
    for (compile, reload) in deltas {
        let cycle = run_cycle(&mut timer, compile, reload);
        expected += compile + reload;
        assert!((cycle.idle_delta - (compile + reload)).abs() < 1e-9);
        assert!((cycle.overall - expected).abs() < 1e-9);
    }

    assert!((timer.store().get_float("Game_OverallIdleTime") - expected).abs() < 1e-9);
}

#[test]
fn finish_without_start_does_nothing() {
    let mut timer = timer_at(3.0);

    assert_eq!(
        timer.dispatch(HostEvent::CompilationFinished).unwrap(),
        Outcome::NotStarted
    );
    assert!(!timer.store().has_key("Game_LastCompileIdleTime"));
    assert!(!timer.store().has_key("Game_OverallIdleTime"));
}

#[test]
fn reload_without_start_does_nothing() {
    let mut timer = timer_at(3.0);

    assert_eq!(
        timer.dispatch(HostEvent::ReloadFinished).unwrap(),
        Outcome::NotStarted
    );
    assert!(!timer.store().has_key("Game_OverallIdleTime"));
}

#[test]
fn handlers_are_one_shot_until_reinitialised() {
    let mut timer = timer_at(1.0);

    timer.dispatch(HostEvent::CompilationStarted).unwrap();
    assert!(!timer.is_subscribed(HostEvent::CompilationStarted));

    // a second start in the same cycle must not move the timestamp
    timer.clock().set(4.0);
    assert_eq!(
        timer.dispatch(HostEvent::CompilationStarted).unwrap(),
        Outcome::NotSubscribed
    );
    assert_eq!(timer.store().get_float("Game_LastIdleStartTime"), 1.0);

    timer.dispatch(HostEvent::ReloadFinished).unwrap();
    assert_eq!(
        timer.dispatch(HostEvent::ReloadFinished).unwrap(),
        Outcome::NotSubscribed
    );

    timer.initialize();
    for ev in HostEvent::ALL {
        assert!(timer.is_subscribed(ev));
    }
}

#[test]
fn compile_delta_is_optional_for_reload() {
    let mut timer = timer_at(2.0);

    timer.dispatch(HostEvent::CompilationStarted).unwrap();
    timer.clock().advance(7.0);

    let Outcome::Completed(cycle) = timer.dispatch(HostEvent::ReloadFinished).unwrap() else {
        panic!("reload should complete the cycle");
    };
    assert_eq!(cycle.compile_delta, 0.0);
    assert_eq!(cycle.idle_delta, 7.0);
}

#[test]
fn clear_removes_all_idle_keys() {
    let mut timer = timer_at(0.5);
    run_cycle(&mut timer, 2.0, 1.0);
    timer.dispatch(HostEvent::CompilationStarted).unwrap();
    timer.clock().advance(1.0);
    timer.dispatch(HostEvent::CompilationFinished).unwrap();

    timer.clear().unwrap();

    let store = timer.store();
    for key in ["Game_OverallIdleTime", "Game_LastIdleStartTime", "Game_LastCompileIdleTime"] {
        assert!(!store.has_key(key), "{key} should be gone");
        assert_eq!(store.get_float(key), 0.0);
    }
}

#[test]
fn toggle_twice_restores_flag_and_persists() {
    let mut timer = timer_at(0.0);
    assert!(timer.is_active());

    assert!(!timer.toggle().unwrap());
    assert!(!timer.store().get_bool("Game_Active", true));

    assert!(timer.toggle().unwrap());
    assert!(timer.is_active());
    assert!(timer.store().get_bool("Game_Active", false));
}

#[test]
fn disabled_timer_still_unsubscribes_but_records_nothing() {
    let mut timer = timer_at(0.0);
    timer.toggle().unwrap();

    assert_eq!(
        timer.dispatch(HostEvent::CompilationStarted).unwrap(),
        Outcome::Inactive
    );
    assert!(!timer.is_subscribed(HostEvent::CompilationStarted));
    assert!(!timer.store().has_key("Game_LastIdleStartTime"));

    // disabled timers do not re-arm on initialisation
    timer.initialize();
    assert!(!timer.is_subscribed(HostEvent::CompilationStarted));
}

#[test]
fn persisted_disabled_flag_skips_subscription() {
    let mut store = MemoryStore::new();
    store.set_bool("Game_Active", false).unwrap();

    let timer = IdleTimer::new(ManualClock::at(0.0), store, PrefKeys::for_project("Game"));
    assert!(!timer.is_active());
    assert!(timer.info().armed.is_empty());
}

#[test]
fn projects_do_not_share_tallies() {
    let mut store = MemoryStore::new();
    store.set_float("Other_OverallIdleTime", 99.0).unwrap();

    let mut timer = IdleTimer::new(ManualClock::at(1.0), store, PrefKeys::for_project("Game"));
    let cycle = run_cycle(&mut timer, 1.0, 1.0);

    assert_eq!(cycle.overall, 2.0);
    assert_eq!(timer.store().get_float("Other_OverallIdleTime"), 99.0);
}

#[test]
fn start_from_the_future_is_discarded() {
    let mut store = MemoryStore::new();
    store.set_float("Game_LastIdleStartTime", 500.0).unwrap();
    store.set_float("Game_OverallIdleTime", 10.0).unwrap();

    let mut timer = IdleTimer::new(ManualClock::at(3.0), store, PrefKeys::for_project("Game"));

    assert_eq!(
        timer.dispatch(HostEvent::ReloadFinished).unwrap(),
        Outcome::NotStarted
    );
    assert_eq!(timer.store().get_float("Game_OverallIdleTime"), 10.0);
    assert!(!timer.store().has_key("Game_LastIdleStartTime"));
}

#[test]
fn leftover_cycle_is_dropped_on_startup() {
    let mut store = MemoryStore::new();
    store.set_float("Game_LastIdleStartTime", 2.0).unwrap();
    store.set_float("Game_LastCompileIdleTime", 1.0).unwrap();
    store.set_float("Game_OverallIdleTime", 4.0).unwrap();

    let mut timer = IdleTimer::new(ManualClock::at(0.0), store, PrefKeys::for_project("Game"));
    assert!(timer.drop_unfinished_cycle().unwrap());
    assert!(!timer.drop_unfinished_cycle().unwrap());

    let info = timer.info();
    assert_eq!(info.pending_start, None);
    assert_eq!(info.last_compile, None);
    assert_eq!(info.overall, 4.0);
}

#[test]
fn info_reflects_pending_cycle() {
    let mut timer = timer_at(1.0);
    timer.dispatch(HostEvent::CompilationStarted).unwrap();
    timer.clock().set(2.5);
    timer.dispatch(HostEvent::CompilationFinished).unwrap();

    let info = timer.info();
    assert_eq!(info.project, "Game");
    assert!(info.active);
    assert_eq!(info.armed, vec![HostEvent::ReloadFinished]);
    assert_eq!(info.pending_start, Some(1.0));
    assert_eq!(info.last_compile, Some(1.5));
    assert_eq!(info.now, 2.5);
}

#[test]
fn failed_reload_write_does_not_double_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let blocker = dir.path().join("prefs.json.tmp");

    let mut timer = IdleTimer::new(
        ManualClock::at(0.0),
        JsonFileStore::open(&path).unwrap(),
        PrefKeys::for_project("Game"),
    );
    timer.dispatch(HostEvent::CompilationStarted).unwrap();

    std::fs::create_dir(&blocker).unwrap();
    timer.clock().set(5.0);
    assert!(timer.dispatch(HostEvent::ReloadFinished).is_err());

    // nothing was committed: the start is still pending, the total untouched
    assert_eq!(timer.store().get_float("Game_OverallIdleTime"), 0.0);
    assert_eq!(timer.info().pending_start, Some(0.0));

    std::fs::remove_dir(&blocker).unwrap();
    timer.initialize();
    timer.clock().set(6.0);
    match timer.dispatch(HostEvent::ReloadFinished).unwrap() {
        Outcome::Completed(cycle) => assert_eq!(cycle.overall, 6.0),
        other => panic!("expected a completed cycle, got {other:?}"),
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get_float("Game_OverallIdleTime"), 6.0);
    assert!(!reopened.has_key("Game_LastIdleStartTime"));
}
