// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::str::FromStr;

use crate::core::error::Error;

/// Lifecycle notifications published by the host build system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HostEvent {
    CompilationStarted,
    CompilationFinished,
    ReloadFinished,
}

impl HostEvent {
    pub const ALL: [HostEvent; 3] = [
        HostEvent::CompilationStarted,
        HostEvent::CompilationFinished,
        HostEvent::ReloadFinished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostEvent::CompilationStarted => "compilation-started",
            HostEvent::CompilationFinished => "compilation-finished",
            HostEvent::ReloadFinished => "reload-finished",
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "compilation-started" | "compilation_started" => Ok(HostEvent::CompilationStarted),
            "compilation-finished" | "compilation_finished" => Ok(HostEvent::CompilationFinished),
            "reload-finished" | "reload_finished" => Ok(HostEvent::ReloadFinished),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}
