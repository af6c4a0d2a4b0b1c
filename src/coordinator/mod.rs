//! The `coordinator` module talks to the coordinator ("master") service that
//! decides where each unit of work is streamed.
//!
//! It offers a liveness probe, the endpoint resolver and a queue-length query,
//! and defines the `Endpoint` descriptor the resolver returns.

pub mod client;
pub mod endpoint;

pub use client::{CoordinatorClient, StreamRequest};
pub use endpoint::{Endpoint, Role};
