//! The `error` module defines the error types used across `stream-connector`.
//!
//! Errors are grouped by concern: configuration problems surface when a
//! connector is built, `ResolveError` and `PushError` describe a single failed
//! attempt against the coordinator or a destination, and `SendError` is what a
//! whole `send_data` call reports once its retry budget is spent.

use std::io;

use thiserror::Error;

use crate::coordinator::Endpoint;

/// Raised while turning settings into a usable connector.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("invalid coordinator address '{0}': expected an IPv4 or IPv6 literal")]
    InvalidAddress(String),

    #[error("coordinator port must be non-zero")]
    InvalidPort,

    #[error("unsupported scheme '{0}': expected http or https")]
    InvalidScheme(String),

    #[error("auth token must not be empty")]
    EmptyToken,

    #[error("max_try must be at least 1")]
    ZeroRetryBudget,

    #[error("idle time must be a finite, non-negative number of seconds (got {0})")]
    InvalidIdleTime(f64),

    #[error("could not determine local hostname: {0}")]
    Hostname(#[source] io::Error),

    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// One failed endpoint-resolution request.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("coordinator unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("coordinator queue is full (406)")]
    QueueFull,

    #[error("coordinator internal error (500)")]
    Internal,

    #[error("coordinator rejected the token (401): {0}")]
    Unauthorized(String),

    #[error("coordinator answered with unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("malformed endpoint descriptor: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// One failed push attempt to a resolved destination.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("could not resolve {address}:{port}: {source}")]
    Resolve {
        address: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("{address}:{port} resolved to no socket addresses")]
    NoAddress { address: String, port: u16 },

    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    #[error("connect timed out")]
    ConnectTimeout,

    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    #[error("name is {0} bytes; the broker length prefix holds at most 999")]
    NameTooLong(usize),
}

/// Final outcome of a failed `send_data` call.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("payload is empty")]
    EmptyPayload,

    #[error("no endpoint after {attempts} attempt(s): {last}")]
    NoEndpoint { attempts: u32, last: ResolveError },

    #[error("coordinator returned unsupported role '{role}' for {address}:{port}")]
    UnknownRole {
        role: String,
        address: String,
        port: u16,
    },

    #[error("push to {endpoint} failed after {attempts} attempt(s): {last}")]
    PushExhausted {
        endpoint: Endpoint,
        attempts: u32,
        last: PushError,
    },

    #[error("push to {endpoint} rejected: {source}")]
    PushRejected {
        endpoint: Endpoint,
        #[source]
        source: PushError,
    },

    #[error("send cancelled")]
    Cancelled,
}

impl SendError {
    /// True when the call gave up because a retry budget ran out.
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self,
            SendError::NoEndpoint { .. } | SendError::PushExhausted { .. }
        )
    }
}
