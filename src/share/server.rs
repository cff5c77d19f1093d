//! Serving side of the transfer protocol: a one-shot listener that hands
//! a staged file to exactly one client, then terminates.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::share::registry::OfferRegistry;
use crate::storage;

const CHUNK_SIZE: usize = 4096;

/// Claim the offer's port up front. Binding happens before the code is
/// revealed to the uploader, so a taken port turns into an upload error
/// instead of a code that can never be fetched.
pub async fn bind(code: u16) -> Result<TcpListener> {
    TcpListener::bind(("0.0.0.0", code))
        .await
        .with_context(|| format!("failed to bind transfer listener on port {code}"))
}

/// Wait for the single client this offer gets, then hand the connection
/// to a sender task. No accept loop: once a connection arrives the
/// listener is dropped and the offer is spent. Runs detached, so every
/// failure past this point is logged rather than reported upstream.
pub async fn serve(registry: Arc<OfferRegistry>, code: u16, listener: TcpListener) {
    let Some(path) = registry.lookup(code) else {
        tracing::warn!("no file is associated with code {code}");
        return;
    };
    tracing::info!(
        "serving file {} on port {code}",
        storage::display_name(&path)
    );

    let (stream, peer) = match listener.accept().await {
        Ok(accepted) => accepted,
        Err(err) => {
            tracing::warn!("transfer listener on port {code} failed to accept: {err}");
            return;
        }
    };
    drop(listener);
    tracing::info!("client connection from {peer}");

    tokio::spawn(async move {
        if let Err(err) = send_file(stream, &path).await {
            tracing::warn!("error while sending {}: {err:#}", path.display());
        }
    });
}

/// Header line first, then the payload in fixed-size chunks. Closing the
/// stream is the wire-level end-of-file; there is no length prefix.
async fn send_file(mut stream: TcpStream, path: &Path) -> Result<()> {
    let file_name = storage::display_name(path);
    let mut file = File::open(path)
        .await
        .with_context(|| format!("failed to open staged file {}", path.display()))?;

    let header = format!("Filename: {file_name}\n");
    stream.write_all(header.as_bytes()).await?;

    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        stream.write_all(&buffer[..read]).await?;
    }
    stream.shutdown().await?;

    tracing::info!("file {file_name} sent");
    Ok(())
}
