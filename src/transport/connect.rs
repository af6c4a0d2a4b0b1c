use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{TcpStream, lookup_host};
use tracing::debug;

use crate::utils::error::PushError;

/// Run `attempt` over `candidates` in order and return the first success.
///
/// When every candidate fails the error of the last one is returned;
/// `None` means there were no candidates at all.
pub async fn first_success<I, T, E, F, Fut>(candidates: I, mut attempt: F) -> Result<T, Option<E>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last = None;
    for candidate in candidates {
        match attempt(candidate).await {
            Ok(value) => return Ok(value),
            Err(e) => last = Some(e),
        }
    }
    Err(last)
}

/// Resolve `address:port` (IPv4 and IPv6) and connect to the first socket
/// address that accepts within `timeout`.
pub async fn first_connect(
    address: &str,
    port: u16,
    timeout: Duration,
) -> Result<TcpStream, PushError> {
    let addrs: Vec<SocketAddr> = lookup_host((address, port))
        .await
        .map_err(|source| PushError::Resolve {
            address: address.to_string(),
            port,
            source,
        })?
        .collect();

    first_success(addrs, |addr| async move {
        debug!(%addr, "connecting");
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(PushError::Connect(e)),
            Err(_) => Err(PushError::ConnectTimeout),
        }
    })
    .await
    .map_err(|last| {
        last.unwrap_or_else(|| PushError::NoAddress {
            address: address.to_string(),
            port,
        })
    })
}
