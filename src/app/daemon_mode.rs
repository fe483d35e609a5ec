// Author: Dustin Pilgrim
// License: MIT

use std::io;

use crate::cli::Args;
use crate::core::{
    clock::StartupClock,
    project::PrefKeys,
    store::{JsonFileStore, MemoryStore, PrefStore},
    timer::IdleTimer,
};
use crate::daemon::Daemon;
use crate::{sdebug, serror, sinfo, swarn};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run(args: Args) -> Result<(), AnyError> {
    // single-instance
    let _instance_lock = crate::app::platform::acquire_single_instance_lock().map_err(|e| {
        eprintln!("{e}");
        io::Error::new(io::ErrorKind::AlreadyExists, e)
    })?;

    crate::log::set_verbose(args.verbose);
    sdebug!("Idletally", "debug logging enabled");

    // bootstrap only if no --config (and bootstrap itself does "only if missing")
    if args.config.is_none() {
        match crate::config::bootstrap::ensure_user_config_exists() {
            Ok(Some(path)) => sinfo!("Idletally", "wrote default config to {}", path.display()),
            Ok(None) => {}
            Err(e) => swarn!("Idletally", "failed to bootstrap default config: {e}"),
        }
    }

    // load (built-in defaults when no file is found)
    let (cfg, config_path) = crate::config::load(args.config.as_deref()).map_err(|e| {
        eprintln!("idletally: {e:#}");
        io::Error::new(io::ErrorKind::InvalidData, format!("{e:#}"))
    })?;

    // file logging
    let log_path = crate::idle_log::default_log_path();
    match crate::idle_log::prepare_log_file(&log_path, cfg.log_policy) {
        Ok(needs_blank) => {
            if needs_blank {
                let _ = crate::idle_log::write_raw_line(&log_path, "");
            }
            let _ = crate::idle_log::write_raw_line(&log_path, &crate::idle_log::run_header());
            crate::log::set_log_file(log_path.clone());
            sinfo!("Idletally", "file logging enabled: {}", log_path.display());
        }
        Err(e) => eprintln!("idletally: failed to prepare log file {}: {e}", log_path.display()),
    }

    match &config_path {
        Some(path) => sinfo!("Idletally", "config loaded from {}", path.display()),
        None => sinfo!("Idletally", "no config file found, using defaults"),
    }

    let store: Box<dyn PrefStore> = match JsonFileStore::open(&cfg.store_path) {
        Ok(store) => {
            sdebug!("Idletally", "preferences at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            serror!("Idletally", "{e}; tallies will not survive this run");
            Box::new(MemoryStore::new())
        }
    };

    let keys = PrefKeys::resolve(cfg.project_resolver().as_ref());
    let timer = IdleTimer::new(StartupClock::new(), store, keys);

    // shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let mut daemon = Daemon::new(timer);

    let mut daemon_task = tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move { daemon.run(shutdown_rx, shutdown_tx).await }
    });

    let res = tokio::select! {
        res = &mut daemon_task => res,

        _ = tokio::signal::ctrl_c() => {
            sinfo!("Idletally", "received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);
            daemon_task.await
        }
    };

    if let Ok(path) = crate::ipc::socket_path() {
        let _ = std::fs::remove_file(path);
    }

    match res {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e),
        Err(join_err) => Err(Box::new(join_err)),
    }
}
