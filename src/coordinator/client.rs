//! HTTP client for the coordinator REST service

use std::collections::HashMap;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ConnectorConfig;
use crate::coordinator::Endpoint;
use crate::utils::error::{ConfigurationError, ResolveError};

pub const STATUS_PATH: &str = "/status";
pub const STREAM_REQUEST_PATH: &str = "/streamRequest";
pub const MESSAGES_QUERY_PATH: &str = "/messagesQuery";

/// Everything the coordinator needs to pick a destination for one payload.
#[derive(Debug, Clone)]
pub struct StreamRequest<'a> {
    pub name: &'a str,
    pub os: &'a str,
    pub priority: u32,
    pub source: &'a str,
    pub digest: &'a str,
}

/// Talks to the coordinator's status, stream-request and message-query routes.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CoordinatorClient {
    base_url: String,
    token: String,
    client: Client,
}

impl CoordinatorClient {
    pub fn new(config: &ConnectorConfig) -> Result<Self, ConfigurationError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ConfigurationError::HttpClient)?;

        Ok(Self {
            base_url: config.base_url(),
            token: config.token.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe. Any answer but 200, or no answer at all, counts as down.
    pub async fn is_alive(&self) -> bool {
        let url = format!("{}{}", self.base_url, STATUS_PATH);

        match self
            .client
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                debug!(status = response.status().as_u16(), "coordinator status check failed");
                false
            }
            Err(e) => {
                debug!(error = %e, "coordinator unreachable");
                false
            }
        }
    }

    /// Ask the coordinator where `request` should be streamed. Makes exactly
    /// one HTTP request.
    pub async fn resolve(&self, request: &StreamRequest<'_>) -> Result<Endpoint, ResolveError> {
        let url = format!("{}{}", self.base_url, STREAM_REQUEST_PATH);
        let priority = request.priority.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("token", self.token.as_str()),
                ("container", request.name),
                ("os", request.os),
                ("priority", priority.as_str()),
                ("source", request.source),
                ("digest", request.digest),
            ])
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, container = request.name, "endpoint request failed"))?;

        self.handle_response(response).await
    }

    /// Number of queued items per unit-of-work name in the messaging system.
    pub async fn queue_lengths(&self) -> Result<HashMap<String, u64>, ResolveError> {
        let url = format!("{}{}", self.base_url, MESSAGES_QUERY_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[("token", self.token.as_str()), ("command", "queueLength")])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ResolveError> {
        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await?;
                Ok(serde_json::from_slice(&body)?)
            }
            StatusCode::NOT_ACCEPTABLE => Err(ResolveError::QueueFull),
            StatusCode::INTERNAL_SERVER_ERROR => Err(ResolveError::Internal),
            StatusCode::UNAUTHORIZED => {
                let body = response.text().await.unwrap_or_default();
                Err(ResolveError::Unauthorized(body))
            }
            other => Err(ResolveError::UnexpectedStatus(other.as_u16())),
        }
    }
}
