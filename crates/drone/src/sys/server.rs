use crate::events::AppEvent;
use async_channel::Sender;
use dronectl::Command;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

pub async fn run_server(socket_path: &Path, tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(socket_path).is_ok() {
        let _ = fs_err::remove_file(socket_path);
    }

    let listener = match UnixListener::bind(socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = serve_client(stream, tx).await {
                        log::warn!("Client connection failed: {}", e);
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn serve_client(stream: UnixStream, tx: Sender<AppEvent>) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(reply) = handle_line(&line, &tx).await {
            writer.write_all(reply.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
    }
    Ok(())
}

/// Forwards one protocol line to the app. Returns the line to send back, if
/// the command has an answer.
async fn handle_line(line: &str, tx: &Sender<AppEvent>) -> Option<String> {
    let command = match line.parse::<Command>() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Rejected '{}': {}", line.trim(), e);
            return Some(format!("error: {}", e));
        }
    };

    let expects_reply = command.expects_reply();
    let (reply_tx, reply_rx) = async_channel::bounded(1);
    if tx
        .send(AppEvent::from_command(command, reply_tx))
        .await
        .is_err()
    {
        return Some("error: daemon is shutting down".to_string());
    }

    if !expects_reply {
        return None;
    }
    Some(
        reply_rx
            .recv()
            .await
            .unwrap_or_else(|_| "error: no reply".to_string()),
    )
}
