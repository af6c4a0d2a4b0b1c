use std::time::Duration;

use super::connect::{first_connect, first_success};
use super::frame::{MAX_NAME_LEN, broker_header};
use super::{push_broker, push_worker};
use crate::tests::support::{Capture, closed_addr};
use crate::utils::error::PushError;

const TIMEOUT: Duration = Duration::from_secs(2);

#[test]
fn test_broker_header_pads_length() {
    assert_eq!(broker_header("my-task").unwrap(), b"007my-task".to_vec());
    assert_eq!(broker_header("").unwrap(), b"000".to_vec());
}

#[test]
fn test_broker_header_counts_utf8_bytes() {
    // "é" is two bytes in UTF-8
    let header = broker_header("café").unwrap();
    assert_eq!(&header[..3], b"005");
    assert_eq!(&header[3..], "café".as_bytes());
}

#[test]
fn test_broker_header_limits() {
    let longest = "a".repeat(MAX_NAME_LEN);
    let header = broker_header(&longest).unwrap();
    assert_eq!(&header[..3], b"999");

    let too_long = "a".repeat(MAX_NAME_LEN + 1);
    assert!(matches!(
        broker_header(&too_long),
        Err(PushError::NameTooLong(1000))
    ));
}

#[tokio::test]
async fn test_first_success_returns_first_ok() {
    let mut tried = Vec::new();
    let result: Result<u32, Option<&str>> = first_success([1, 2, 3], |n| {
        tried.push(n);
        async move { if n >= 2 { Ok(n * 10) } else { Err("refused") } }
    })
    .await;

    assert_eq!(result, Ok(20));
    assert_eq!(tried, vec![1, 2]);
}

#[tokio::test]
async fn test_first_success_reports_last_error() {
    let result: Result<u32, Option<String>> =
        first_success(["a", "b"], |c| async move { Err(format!("{c} failed")) }).await;
    assert_eq!(result, Err(Some("b failed".to_string())));

    let empty: Result<u32, Option<String>> =
        first_success(Vec::<u8>::new(), |_| async { Ok(1) }).await;
    assert_eq!(empty, Err(None));
}

#[tokio::test]
async fn test_first_connect_refused() {
    let addr = closed_addr();
    let err = first_connect("127.0.0.1", addr.port(), TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, PushError::Connect(_)));
}

#[tokio::test]
async fn test_worker_push_writes_payload_verbatim() {
    let mut capture = Capture::start().await;

    push_worker("127.0.0.1", capture.port(), b"hello", TIMEOUT)
        .await
        .expect("push");

    assert_eq!(capture.next().await, b"hello".to_vec());
}

#[tokio::test]
async fn test_worker_push_accepts_localhost_name() {
    let mut capture = Capture::start().await;

    push_worker("localhost", capture.port(), b"by name", TIMEOUT)
        .await
        .expect("push");

    assert_eq!(capture.next().await, b"by name".to_vec());
}

#[tokio::test]
async fn test_broker_push_prefixes_name() {
    let mut capture = Capture::start().await;

    push_broker("127.0.0.1", capture.port(), "my-task", b"payload", TIMEOUT)
        .await
        .expect("push");

    assert_eq!(capture.next().await, b"007my-taskpayload".to_vec());
}

#[tokio::test]
async fn test_broker_push_rejects_long_name_without_connecting() {
    let capture = Capture::start().await;
    let name = "n".repeat(1200);

    let err = push_broker("127.0.0.1", capture.port(), &name, b"x", TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(err, PushError::NameTooLong(1200)));
    assert_eq!(capture.connections(), 0);
}

#[tokio::test]
async fn test_push_to_closed_port_fails() {
    let addr = closed_addr();
    let err = push_worker("127.0.0.1", addr.port(), b"hello", TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, PushError::Connect(_)));
}
