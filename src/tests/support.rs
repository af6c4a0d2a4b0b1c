//! Shared fixtures: connector configs aimed at mock servers, a closed port,
//! and a TCP listener that records every pushed stream.

use std::net::{SocketAddr, TcpListener as StdListener};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::ConnectorConfig;
use crate::connector::retry::{Backoff, RetryPolicy};

pub(crate) fn config_for(coordinator: SocketAddr, max_try: u32, idle_ms: u64) -> ConnectorConfig {
    ConnectorConfig {
        coordinator,
        scheme: "http".to_string(),
        token: "None".to_string(),
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryPolicy::new(max_try, Backoff::Fixed(Duration::from_millis(idle_ms))),
        source: "test-source".to_string(),
    }
}

/// An address nothing listens on.
pub(crate) fn closed_addr() -> SocketAddr {
    let listener = StdListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}

/// Accepts connections on 127.0.0.1 and yields each stream's bytes once the
/// sender closes it.
pub(crate) struct Capture {
    port: u16,
    accepted: Arc<AtomicUsize>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl Capture {
    pub(crate) async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let accepted = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::unbounded_channel();

        let counter = accepted.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    if stream.read_to_end(&mut buf).await.is_ok() {
                        let _ = tx.send(buf);
                    }
                });
            }
        });

        Self { port, accepted, rx }
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    pub(crate) fn connections(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    pub(crate) async fn next(&mut self) -> Vec<u8> {
        tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for a pushed stream")
            .expect("capture closed")
    }
}
