//! Stream connector
//!
//! `StreamConnector` is the data-source side of the routing protocol. For each
//! payload it:
//! - rejects empty payloads and computes the MD5 digest once
//! - asks the coordinator for an endpoint, retrying per the configured policy
//! - pushes the payload to that endpoint with the role's sub-protocol,
//!   retrying the whole push on failure (no partial-write resume)
//!
//! Concurrency notes:
//! - The connector holds no per-call state, so concurrent `send_data` calls
//!   race independently against the coordinator.
//! - Sockets are opened and closed per push attempt.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::config::{ConnectorConfig, Settings};
use crate::connector::retry::{RetryError, retry};
use crate::coordinator::{CoordinatorClient, Endpoint, Role, StreamRequest};
use crate::transport::{push_broker, push_worker};
use crate::utils::digest::md5_hex;
use crate::utils::error::{ConfigurationError, SendError};

pub const DEFAULT_PRIORITY: u32 = 0;

/// Details of a completed send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub endpoint: Endpoint,
    pub digest: String,
    pub resolve_attempts: u32,
    pub push_attempts: u32,
    /// Milliseconds since the UNIX epoch.
    pub completed_at: i64,
}

#[derive(Debug, Clone)]
pub struct StreamConnector {
    config: ConnectorConfig,
    coordinator: CoordinatorClient,
}

impl StreamConnector {
    pub fn new(config: ConnectorConfig) -> Result<Self, ConfigurationError> {
        let coordinator = CoordinatorClient::new(&config)?;
        Ok(Self {
            config,
            coordinator,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigurationError> {
        Self::new(ConnectorConfig::from_settings(settings)?)
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &CoordinatorClient {
        &self.coordinator
    }

    pub async fn is_master_alive(&self) -> bool {
        self.coordinator.is_alive().await
    }

    /// Route `payload` to wherever the coordinator says `name` should go.
    pub async fn send_data(
        &self,
        name: &str,
        os: &str,
        payload: &[u8],
        priority: impl Into<Option<u32>>,
    ) -> Result<Delivery, SendError> {
        self.send_data_with_cancel(name, os, payload, priority, &CancellationToken::new())
            .await
    }

    /// `send_data` that stops with `SendError::Cancelled` once `cancel` fires.
    pub async fn send_data_with_cancel(
        &self,
        name: &str,
        os: &str,
        payload: &[u8],
        priority: impl Into<Option<u32>>,
        cancel: &CancellationToken,
    ) -> Result<Delivery, SendError> {
        let priority = priority.into().unwrap_or(DEFAULT_PRIORITY);
        let span = info_span!("send_data", request_id = %Uuid::new_v4(), container = name);

        async {
            let result = self.route(name, os, payload, priority, cancel).await;
            match &result {
                Ok(delivery) => info!(
                    destination = %delivery.endpoint,
                    digest = %delivery.digest,
                    resolve_attempts = delivery.resolve_attempts,
                    push_attempts = delivery.push_attempts,
                    "payload delivered"
                ),
                Err(e) => error!(error = %e, "payload not delivered"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Boolean form of `send_data`: `true` on delivery, `false` otherwise.
    /// The failure reason is only logged.
    pub async fn send_data_ok(
        &self,
        name: &str,
        os: &str,
        payload: &[u8],
        priority: impl Into<Option<u32>>,
    ) -> bool {
        self.send_data(name, os, payload, priority).await.is_ok()
    }

    async fn route(
        &self,
        name: &str,
        os: &str,
        payload: &[u8],
        priority: u32,
        cancel: &CancellationToken,
    ) -> Result<Delivery, SendError> {
        if payload.is_empty() {
            return Err(SendError::EmptyPayload);
        }
        let digest = md5_hex(payload);

        let request = StreamRequest {
            name,
            os,
            priority,
            source: &self.config.source,
            digest: &digest,
        };

        let (endpoint, resolve_attempts) =
            retry(&self.config.retry, cancel, |_| self.coordinator.resolve(&request))
                .await
                .map_err(|e| match e {
                    RetryError::Exhausted { attempts, last } => {
                        SendError::NoEndpoint { attempts, last }
                    }
                    RetryError::Aborted { attempt, error } => SendError::NoEndpoint {
                        attempts: attempt,
                        last: error,
                    },
                    RetryError::Cancelled => SendError::Cancelled,
                })?;

        let timeout = self.config.connect_timeout;
        let pushed = match &endpoint.role {
            Role::Worker => {
                retry(&self.config.retry, cancel, |_| {
                    push_worker(&endpoint.address, endpoint.port, payload, timeout)
                })
                .await
            }
            Role::MessagingSystem => {
                retry(&self.config.retry, cancel, |_| {
                    push_broker(&endpoint.address, endpoint.port, name, payload, timeout)
                })
                .await
            }
            Role::Unsupported(role) => {
                return Err(SendError::UnknownRole {
                    role: role.clone(),
                    address: endpoint.address.clone(),
                    port: endpoint.port,
                });
            }
        };

        let push_attempts = match pushed {
            Ok(((), attempts)) => attempts,
            Err(RetryError::Exhausted { attempts, last }) => {
                return Err(SendError::PushExhausted {
                    endpoint,
                    attempts,
                    last,
                });
            }
            Err(RetryError::Aborted { error, .. }) => {
                return Err(SendError::PushRejected {
                    endpoint,
                    source: error,
                });
            }
            Err(RetryError::Cancelled) => return Err(SendError::Cancelled),
        };

        Ok(Delivery {
            endpoint,
            digest,
            resolve_attempts,
            push_attempts,
            completed_at: chrono::Utc::now().timestamp_millis(),
        })
    }
}
