// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, oneshot};

use crate::core::daemon_msg::DaemonMsg;

pub async fn handle_info(tx: &mpsc::Sender<DaemonMsg>, as_json: bool) -> String {
    let (reply_tx, reply_rx) = oneshot::channel();

    if tx
        .send(DaemonMsg::GetInfo { reply: reply_tx })
        .await
        .is_err()
    {
        return "ERROR: daemon message channel closed".to_string();
    }

    match reply_rx.await {
        Ok(info) if as_json => info.to_json(),
        Ok(info) => info.pretty_print(),
        Err(_) => "ERROR: daemon info channel closed".to_string(),
    }
}
