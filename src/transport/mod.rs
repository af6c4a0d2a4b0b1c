//! The `transport` module moves payloads to their destination over raw TCP.
//!
//! It resolves the destination to every candidate socket address, connects to
//! the first one that accepts, and writes the payload with the sub-protocol
//! that matches the destination's role: verbatim for workers, behind a
//! length-prefixed name for messaging-system brokers.

pub mod connect;
pub mod frame;
pub mod push;

pub use push::{push_broker, push_worker};

#[cfg(test)]
mod tests;
