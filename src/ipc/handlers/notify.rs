// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, oneshot};

use crate::core::{daemon_msg::DaemonMsg, events::HostEvent};

/// Forward a host lifecycle notification to the timer.
pub async fn handle_notify(tx: &mpsc::Sender<DaemonMsg>, event: HostEvent) -> String {
    let (reply_tx, reply_rx) = oneshot::channel();

    if tx
        .send(DaemonMsg::Notify { event, reply: reply_tx })
        .await
        .is_err()
    {
        return "ERROR: daemon message channel closed".to_string();
    }

    match reply_rx.await {
        Ok(Ok(msg)) => msg,
        Ok(Err(e)) => format!("ERROR: {e}"),
        Err(_) => "ERROR: No response from daemon".to_string(),
    }
}
