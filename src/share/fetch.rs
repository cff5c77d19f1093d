//! Client side of the transfer protocol.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::TcpStream;

const FILENAME_PREFIX: &str = "Filename: ";
const FALLBACK_NAME: &str = "downloaded-file";

/// A completed fetch. The protocol carries no length, so a connection
/// dropped mid-stream is indistinguishable from a short file; `content`
/// simply holds whatever arrived before the peer closed.
#[derive(Debug)]
pub struct FetchedFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Pull the offer behind `code`. The header line runs to the first `\n`,
/// the payload to connection close.
pub async fn fetch(code: u16) -> Result<FetchedFile> {
    let stream = TcpStream::connect(("127.0.0.1", code))
        .await
        .with_context(|| format!("failed to connect to transfer server on port {code}"))?;
    let mut reader = BufReader::new(stream);

    let mut header = Vec::new();
    reader
        .read_until(b'\n', &mut header)
        .await
        .context("failed to read transfer header")?;
    let header = String::from_utf8_lossy(&header);

    let file_name = header
        .trim()
        .strip_prefix(FILENAME_PREFIX)
        .unwrap_or(FALLBACK_NAME)
        .to_string();

    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .await
        .context("failed to read transfer payload")?;

    Ok(FetchedFile { file_name, content })
}
