// Author: Dustin Pilgrim
// License: MIT

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::events::HostEvent;

#[derive(Parser, Debug)]
#[command(
    name = "idletally",
    version = env!("CARGO_PKG_VERSION"),
    about = "Tallies the time spent waiting on compile and reload cycles"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(about = "Notify the daemon that compilation started")]
    CompilationStarted,

    #[command(about = "Notify the daemon that compilation finished")]
    CompilationFinished,

    #[command(about = "Notify the daemon that the post-compile reload finished")]
    ReloadFinished,

    #[command(about = "Clear all idle times recorded for the current project")]
    Clear,

    #[command(about = "Enable or disable the idle timer")]
    Toggle,

    #[command(about = "Display the current project's idle tally")]
    Info {
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Stop the running idletally daemon")]
    Stop,
}

impl Command {
    /// The IPC wire form of the command.
    pub fn wire(&self) -> String {
        let wire = match self {
            Command::CompilationStarted => HostEvent::CompilationStarted.as_str(),
            Command::CompilationFinished => HostEvent::CompilationFinished.as_str(),
            Command::ReloadFinished => HostEvent::ReloadFinished.as_str(),
            Command::Clear => "clear",
            Command::Toggle => "toggle",
            Command::Info { json: true } => "info --json",
            Command::Info { json: false } => "info",
            Command::Stop => "stop",
        };
        wire.to_string()
    }
}
