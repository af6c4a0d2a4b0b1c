use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::transport::connect::first_connect;
use crate::transport::frame::broker_header;
use crate::utils::error::PushError;

/// Stream `payload` verbatim to a worker.
pub async fn push_worker(
    address: &str,
    port: u16,
    payload: &[u8],
    connect_timeout: Duration,
) -> Result<(), PushError> {
    let stream = first_connect(address, port, connect_timeout).await?;
    write_and_close(stream, &[payload]).await
}

/// Stream `name` and `payload` to a messaging-system broker, header first.
///
/// The header is built before connecting so an unframeable name never opens
/// a socket.
pub async fn push_broker(
    address: &str,
    port: u16,
    name: &str,
    payload: &[u8],
    connect_timeout: Duration,
) -> Result<(), PushError> {
    let header = broker_header(name)?;
    let stream = first_connect(address, port, connect_timeout).await?;
    write_and_close(stream, &[&header, payload]).await
}

async fn write_and_close(mut stream: TcpStream, parts: &[&[u8]]) -> Result<(), PushError> {
    for part in parts {
        stream.write_all(part).await.map_err(PushError::Write)?;
    }
    // Half-close so the receiver reads EOF as the end of the payload.
    stream.shutdown().await.map_err(PushError::Write)?;

    let written: usize = parts.iter().map(|p| p.len()).sum();
    debug!(bytes = written, "push complete");
    Ok(())
}
