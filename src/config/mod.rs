mod settings;

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use config::{Config, Environment, File};

use crate::connector::retry::{Backoff, RetryPolicy};
use crate::utils::error::ConfigurationError;

pub use settings::{ConnectorSettings, CoordinatorSettings, PartialSettings, Settings};

/// Prefix of the environment variables read by `load_config`, e.g.
/// `STREAM_CONNECTOR__COORDINATOR__ADDRESS=10.0.0.1`.
pub const ENV_PREFIX: &str = "STREAM_CONNECTOR";

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the coordinator and connector configurations
pub fn load_config() -> Result<Settings, ConfigurationError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge_with_defaults())
}

/// Validated, ready-to-use form of `Settings`.
///
/// Every check happens here so that nothing touches the network with a bad
/// address or an empty retry budget.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub coordinator: SocketAddr,
    pub scheme: String,
    pub token: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryPolicy,
    pub source: String,
}

impl ConnectorConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigurationError> {
        let coordinator = &settings.coordinator;
        let connector = &settings.connector;

        let ip: IpAddr = coordinator
            .address
            .trim()
            .parse()
            .map_err(|_| ConfigurationError::InvalidAddress(coordinator.address.clone()))?;

        if coordinator.port == 0 {
            return Err(ConfigurationError::InvalidPort);
        }

        let scheme = coordinator.scheme.to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigurationError::InvalidScheme(coordinator.scheme.clone()));
        }

        if coordinator.token.is_empty() {
            return Err(ConfigurationError::EmptyToken);
        }

        if connector.max_try == 0 {
            return Err(ConfigurationError::ZeroRetryBudget);
        }

        let idle = seconds(connector.idle_time_secs)?;
        let backoff = match connector.max_backoff_secs {
            Some(max) => Backoff::Exponential {
                initial: idle,
                max: seconds(max)?,
                factor: 2,
            },
            None => Backoff::Fixed(idle),
        };

        let source = match &connector.source {
            Some(source) if !source.is_empty() => source.clone(),
            _ => local_hostname()?,
        };

        Ok(Self {
            coordinator: SocketAddr::new(ip, coordinator.port),
            scheme,
            token: coordinator.token.clone(),
            request_timeout: Duration::from_secs(coordinator.request_timeout_secs),
            connect_timeout: Duration::from_secs(connector.connect_timeout_secs),
            retry: RetryPolicy::new(connector.max_try, backoff),
            source,
        })
    }

    /// `scheme://addr:port`, with IPv6 addresses in brackets.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.coordinator)
    }
}

fn seconds(value: f64) -> Result<Duration, ConfigurationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigurationError::InvalidIdleTime(value));
    }
    Ok(Duration::from_secs_f64(value))
}

fn local_hostname() -> Result<String, ConfigurationError> {
    let name = hostname::get().map_err(ConfigurationError::Hostname)?;
    Ok(name.to_string_lossy().into_owned())
}
