// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::mpsc;

use crate::core::{daemon_msg::DaemonMsg, events::HostEvent};
use crate::swarn;

use super::handlers::{control, info, notify};

/// Routes incoming commands to appropriate handlers
pub async fn route_command(cmd: &str, tx: &mpsc::Sender<DaemonMsg>) -> String {
    match cmd.trim() {
        "clear" => control::handle_clear(tx).await,
        "toggle" => control::handle_toggle(tx).await,
        "stop" => control::handle_stop(tx).await,

        cmd if cmd == "info" || cmd.starts_with("info ") => {
            let args = cmd.strip_prefix("info").unwrap_or("").trim();
            info::handle_info(tx, args.contains("--json")).await
        }

        other => match other.parse::<HostEvent>() {
            Ok(event) => notify::handle_notify(tx, event).await,
            Err(e) => {
                swarn!("Router", "Rejected IPC command: {}", e);
                format!("ERROR: {e}")
            }
        },
    }
}
