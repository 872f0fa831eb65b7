//! TCP sync feed
//!
//! Newline-delimited JSON stream of [`SyncEvent`]s. Clients connect, read
//! lines, and reconcile their views; the server never reads from the
//! socket. The accept loop and every connection task stop on the bus
//! shutdown token.

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use super::SyncBus;
use crate::utils::AppError;

/// Bind and serve the feed until the bus shuts down.
pub async fn serve(addr: &str, bus: SyncBus) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind sync feed on {addr}: {e}")))?;
    tracing::info!(%addr, "Sync TCP feed listening");

    let shutdown = bus.shutdown_token();
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        tracing::debug!(%peer, "sync subscriber connected");
                        let bus = bus.clone();
                        let token = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) = stream_events(stream, bus, token).await {
                                tracing::debug!(%peer, error = %e, "sync subscriber dropped");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "sync feed accept failed");
                    }
                }
            }
            _ = shutdown.cancelled() => {
                tracing::info!("Sync TCP feed shutting down");
                return Ok(());
            }
        }
    }
}

async fn stream_events(
    mut stream: TcpStream,
    bus: SyncBus,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let mut subscription = bus.subscribe();
    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else { return Ok(()) };
                let mut line = serde_json::to_vec(&event).unwrap_or_default();
                line.push(b'\n');
                stream.write_all(&line).await?;
            }
            _ = shutdown.cancelled() => {
                let _ = stream.shutdown().await;
                return Ok(());
            }
        }
    }
}
