use serde::Deserialize;

/// Top-level configuration settings for the connector.
///
/// Includes settings for reaching the coordinator and for the send loop.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub coordinator: CoordinatorSettings,
    pub connector: ConnectorSettings,
    pub log_level: String,
}

/// Where the coordinator lives and how to talk to it.
#[derive(Debug, Deserialize, Clone)]
pub struct CoordinatorSettings {
    pub address: String,
    pub port: u16,
    pub scheme: String,
    pub token: String,
    pub request_timeout_secs: u64,
}

/// Retry budget, backoff and identity used by `send_data`.
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectorSettings {
    pub idle_time_secs: f64,
    pub max_try: u32,
    /// Source identity; the local hostname when unset.
    pub source: Option<String>,
    pub connect_timeout_secs: u64,
    /// Grow the idle time exponentially up to this cap instead of keeping it fixed.
    pub max_backoff_secs: Option<f64>,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub coordinator: Option<PartialCoordinatorSettings>,
    pub connector: Option<PartialConnectorSettings>,
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialCoordinatorSettings {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub scheme: Option<String>,
    pub token: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialConnectorSettings {
    pub idle_time_secs: Option<f64>,
    pub max_try: Option<u32>,
    pub source: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub max_backoff_secs: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            coordinator: CoordinatorSettings {
                address: "127.0.0.1".to_string(),
                port: 8080,
                scheme: "http".to_string(),
                token: "None".to_string(),
                request_timeout_secs: 30,
            },
            connector: ConnectorSettings {
                idle_time_secs: 0.0,
                max_try: 9,
                source: None,
                connect_timeout_secs: 10,
                max_backoff_secs: None,
            },
            log_level: "info".to_string(),
        }
    }
}

impl PartialSettings {
    /// Fill every missing value from `Settings::default()`.
    pub fn merge_with_defaults(self) -> Settings {
        let default = Settings::default();
        let coordinator = self.coordinator;
        let connector = self.connector;

        Settings {
            coordinator: CoordinatorSettings {
                address: coordinator
                    .as_ref()
                    .and_then(|c| c.address.clone())
                    .unwrap_or(default.coordinator.address),
                port: coordinator
                    .as_ref()
                    .and_then(|c| c.port)
                    .unwrap_or(default.coordinator.port),
                scheme: coordinator
                    .as_ref()
                    .and_then(|c| c.scheme.clone())
                    .unwrap_or(default.coordinator.scheme),
                token: coordinator
                    .as_ref()
                    .and_then(|c| c.token.clone())
                    .unwrap_or(default.coordinator.token),
                request_timeout_secs: coordinator
                    .as_ref()
                    .and_then(|c| c.request_timeout_secs)
                    .unwrap_or(default.coordinator.request_timeout_secs),
            },
            connector: ConnectorSettings {
                idle_time_secs: connector
                    .as_ref()
                    .and_then(|c| c.idle_time_secs)
                    .unwrap_or(default.connector.idle_time_secs),
                max_try: connector
                    .as_ref()
                    .and_then(|c| c.max_try)
                    .unwrap_or(default.connector.max_try),
                source: connector
                    .as_ref()
                    .and_then(|c| c.source.clone())
                    .or(default.connector.source),
                connect_timeout_secs: connector
                    .as_ref()
                    .and_then(|c| c.connect_timeout_secs)
                    .unwrap_or(default.connector.connect_timeout_secs),
                max_backoff_secs: connector
                    .as_ref()
                    .and_then(|c| c.max_backoff_secs)
                    .or(default.connector.max_backoff_secs),
            },
            log_level: self.log_level.unwrap_or(default.log_level),
        }
    }
}
