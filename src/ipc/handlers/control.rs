// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, oneshot};

use crate::core::daemon_msg::DaemonMsg;

type Reply = oneshot::Sender<Result<String, String>>;

async fn request(
    tx: &mpsc::Sender<DaemonMsg>,
    build: impl FnOnce(Reply) -> DaemonMsg,
    fallback: &str,
) -> String {
    let (reply_tx, reply_rx) = oneshot::channel();

    if tx.send(build(reply_tx)).await.is_err() {
        return "ERROR: daemon message channel closed".to_string();
    }

    match reply_rx.await {
        Ok(Ok(msg)) => {
            let out = msg.trim_end();
            if out.is_empty() {
                fallback.to_string()
            } else {
                out.to_string()
            }
        }
        Ok(Err(e)) => format!("ERROR: {}", e.trim_end()),
        Err(_) => "ERROR: No response from daemon".to_string(),
    }
}

/// Handle `idletally clear`: forget every tally of the current project.
pub async fn handle_clear(tx: &mpsc::Sender<DaemonMsg>) -> String {
    request(tx, |reply| DaemonMsg::Clear { reply }, "Idle times cleared").await
}

/// Handle `idletally toggle`: flip the active flag and report the checkmark.
pub async fn handle_toggle(tx: &mpsc::Sender<DaemonMsg>) -> String {
    request(tx, |reply| DaemonMsg::Toggle { reply }, "Toggled idle timer").await
}

/// Handle `idletally stop`.
pub async fn handle_stop(tx: &mpsc::Sender<DaemonMsg>) -> String {
    request(tx, |reply| DaemonMsg::StopDaemon { reply }, "Stopping idletally daemon").await
}
