// Author: Dustin Pilgrim
// License: MIT

use crate::cli::{Args, Command};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

fn fallback_message(cmd: &Command) -> Option<&'static str> {
    match cmd {
        Command::Clear => Some("Idle times cleared"),
        Command::Toggle => Some("Toggled idle timer"),
        Command::Stop => Some("Stopping idletally daemon"),
        _ => None,
    }
}

pub async fn run(args: Args) -> Result<(), AnyError> {
    let Some(cmd) = args.command.as_ref() else {
        return Err("no command given".into());
    };

    match crate::ipc::client::send_raw(&cmd.wire()).await {
        Ok(resp) => {
            let out = resp.trim_end();
            if !out.is_empty() {
                println!("{out}");
            } else if let Some(msg) = fallback_message(cmd) {
                println!("{msg}");
            }
            Ok(())
        }
        Err(e) => {
            if let Command::Info { json: true } = cmd {
                // Status bars need valid JSON on stdout even when the daemon isn't running.
                println!(r#"{{"running":false}}"#);
            } else {
                eprintln!("idletally: {e}");
            }
            Ok(())
        }
    }
}
