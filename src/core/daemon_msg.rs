// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::oneshot;

use crate::core::{events::HostEvent, timer::TimerInfo};

#[derive(Debug)]
pub enum DaemonMsg {
    Notify {
        event: HostEvent,
        reply: oneshot::Sender<Result<String, String>>,
    },

    Clear {
        reply: oneshot::Sender<Result<String, String>>,
    },

    Toggle {
        reply: oneshot::Sender<Result<String, String>>,
    },

    GetInfo { reply: oneshot::Sender<TimerInfo> },

    StopDaemon {
        reply: oneshot::Sender<Result<String, String>>,
    },
}
