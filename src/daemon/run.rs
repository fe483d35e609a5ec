// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, watch};

use crate::core::{clock::Clock, daemon_msg::DaemonMsg, store::PrefStore};
use crate::{sinfo, swarn};

use super::{AnyError, Daemon};

impl<C: Clock, S: PrefStore> Daemon<C, S> {
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Result<(), AnyError> {
        sinfo!("Daemon", "daemon starting");

        let (tx, mut rx) = mpsc::channel::<DaemonMsg>(64);

        if let Err(e) = crate::ipc::server::spawn_ipc_server(tx.clone()).await {
            swarn!("Daemon", "ipc: failed to start: {}", e);
        }

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        sinfo!("Daemon", "daemon stopping (shutdown requested)");
                        break;
                    }
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        sinfo!("Daemon", "daemon stopping (message channel closed)");
                        break;
                    };

                    if !self.handle_msg(msg) {
                        let _ = shutdown_tx.send(true);
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}
