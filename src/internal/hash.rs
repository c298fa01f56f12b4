//! Stable SHA-1 hashing over the canonical object byte stream, and hex
//! encode/decode helpers. This is the "Hash & Hex" component: every other
//! component treats a hash as an opaque 40-char lowercase hex string.

use sha1::{Digest, Sha1};

/// Length in hex characters of a full object hash.
pub const HASH_HEX_LEN: usize = 40;

/// Computes the lowercase hex SHA-1 digest of `bytes`.
///
/// `bytes` must already be the full canonical object encoding (header
/// included) per §3 of the spec — this function does not add a header.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Returns `true` if `s` is a well-formed full object hash: exactly
/// [`HASH_HEX_LEN`] lowercase hex characters.
pub fn is_full_hash(s: &str) -> bool {
    s.len() == HASH_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) && s == s.to_lowercase()
}

/// Returns `true` if `s` is a valid short-hash prefix: 6..40 lowercase hex
/// characters.
pub fn is_short_hash(s: &str) -> bool {
    (6..HASH_HEX_LEN).contains(&s.len())
        && s.bytes().all(|b| b.is_ascii_hexdigit())
        && s == s.to_lowercase()
}
