//! The `utils` module provides the pieces shared by every other module:
//! the error taxonomy, logging setup and payload digesting.

pub mod digest;
pub mod error;
pub mod logging;
