//! # stream-connector
//!
//! `stream-connector` is the data-source client of a push-based stream-routing
//! system. A coordinator ("master") decides where each unit of work goes; this
//! crate asks it, then streams the payload over raw TCP to the chosen worker or
//! messaging-system broker.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `config`: Loads settings from file and environment and validates them.
//! - `connector`: `StreamConnector::send_data` and the bounded retry it runs under.
//! - `coordinator`: HTTP client for the coordinator's status, stream-request and queue routes.
//! - `transport`: Dual-stack TCP connect and the worker/broker wire sub-protocols.
//! - `utils`: Error types, logging setup and payload digests.

pub mod config;
pub mod connector;
pub mod coordinator;
pub mod transport;
pub mod utils;

pub use config::{ConnectorConfig, Settings, load_config};
pub use connector::{Delivery, StreamConnector};
pub use coordinator::{Endpoint, Role};
pub use utils::error::{ConfigurationError, PushError, ResolveError, SendError};

#[cfg(test)]
mod tests;
