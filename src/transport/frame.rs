//! Framing for the messaging-system (broker) sub-protocol.
//!
//! A broker push starts with the unit-of-work name so the broker can file the
//! payload under the right queue:
//!
//! ```text
//! +-----------+----------------+-----------------+
//! | len: 3 B  | name: len B    | payload ...     |
//! | ASCII dec | UTF-8          | until EOF       |
//! +-----------+----------------+-----------------+
//! ```
//!
//! `len` is the UTF-8 byte length of the name, zero padded to three digits.
//! Worker pushes carry no header at all.

use crate::utils::error::PushError;

/// Largest name length the three-digit prefix can express.
pub const MAX_NAME_LEN: usize = 999;

/// Build the `len + name` header written ahead of a broker payload.
pub fn broker_header(name: &str) -> Result<Vec<u8>, PushError> {
    let name = name.as_bytes();
    if name.len() > MAX_NAME_LEN {
        return Err(PushError::NameTooLong(name.len()));
    }

    let mut header = Vec::with_capacity(3 + name.len());
    header.extend_from_slice(format!("{:03}", name.len()).as_bytes());
    header.extend_from_slice(name);
    Ok(header)
}
