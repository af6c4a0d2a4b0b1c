use md5::{Digest, Md5};

/// Lowercase hex MD5 of `payload`, as the coordinator expects in the
/// `digest` query parameter.
pub fn md5_hex(payload: &[u8]) -> String {
    hex::encode(Md5::digest(payload))
}
