//! The `connector` module ties the coordinator client and the transport
//! together into `send_data`, the one call a data source needs, and provides
//! the bounded retry combinator both halves run under.

pub mod retry;
pub mod stream_connector;

pub use stream_connector::{DEFAULT_PRIORITY, Delivery, StreamConnector};
