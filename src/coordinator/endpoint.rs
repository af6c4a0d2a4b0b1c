//! Endpoint descriptors handed out by the coordinator.
//!
//! The coordinator answers a stream request with a JSON object such as
//! `{"role": "worker", "address": "10.0.0.5", "port": 9000}`. The role decides
//! which wire sub-protocol the pusher uses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Destination kind for a unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Accepts the raw payload directly.
    Worker,
    /// Queue broker; needs the length-prefixed name before the payload.
    MessagingSystem,
    /// Anything else the coordinator sends. Never pushed to.
    Unsupported(String),
}

impl Role {
    pub const WORKER: &'static str = "worker";
    pub const MESSAGING_SYSTEM: &'static str = "messaging_system";

    pub fn as_str(&self) -> &str {
        match self {
            Role::Worker => Self::WORKER,
            Role::MessagingSystem => Self::MESSAGING_SYSTEM,
            Role::Unsupported(other) => other,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case(Self::WORKER) {
            Role::Worker
        } else if value.eq_ignore_ascii_case(Self::MESSAGING_SYSTEM) {
            Role::MessagingSystem
        } else {
            Role::Unsupported(value)
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved destination. Ephemeral; never stored by the connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub role: Role,
    pub address: String,
    pub port: u16,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address.contains(':') {
            write!(f, "{} [{}]:{}", self.role, self.address, self.port)
        } else {
            write!(f, "{} {}:{}", self.role, self.address, self.port)
        }
    }
}
