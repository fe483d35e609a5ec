// Author: Dustin Pilgrim
// License: MIT

use std::io;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::mpsc,
    time::{Duration, timeout},
};

use crate::core::daemon_msg::DaemonMsg;
use crate::{sdebug, serror, sinfo};

use super::router::route_command;

/// Binds the daemon socket and spawns the accept loop.
pub async fn spawn_ipc_server(tx: mpsc::Sender<DaemonMsg>) -> io::Result<()> {
    let path = super::socket_path().map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // The single-instance lock is already held, so a leftover socket is stale.
    if path.exists() {
        let _ = std::fs::remove_file(&path);
    }

    let listener = UnixListener::bind(&path)?;
    sinfo!("Ipc", "listening on {}", path.display());

    spawn_ipc_socket_with_listener(tx, listener);
    Ok(())
}

/// Spawns the IPC socket server that listens for incoming commands
pub fn spawn_ipc_socket_with_listener(tx: mpsc::Sender<DaemonMsg>, listener: UnixListener) {
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut stream, _addr)) => {
                    let tx = tx.clone();

                    tokio::spawn(async move {
                        let result = timeout(Duration::from_secs(10), async {
                            if let Err(e) = handle_connection(&mut stream, &tx).await {
                                serror!("Ipc", "Error handling IPC connection: {}", e);
                            }
                        })
                        .await;

                        if result.is_err() {
                            serror!("Ipc", "IPC connection timed out after 10 seconds");
                        }

                        let _ = stream.shutdown().await;
                    });
                }
                Err(e) => serror!("Ipc", "Failed to accept IPC connection: {}", e),
            }
        }
    });
}

/// Handles a single IPC connection: one command in, one reply out.
async fn handle_connection(
    stream: &mut UnixStream,
    tx: &mpsc::Sender<DaemonMsg>,
) -> io::Result<()> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;

    if buf.is_empty() {
        return Ok(());
    }

    let cmd = String::from_utf8_lossy(&buf).trim().to_string();
    sdebug!("Ipc", "Received IPC command: {}", cmd);

    let response = route_command(&cmd, tx).await;

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok(())
}
