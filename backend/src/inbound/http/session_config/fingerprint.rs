//! Session key fingerprints.
//!
//! Operators compare the fingerprint logged at startup across replicas to
//! confirm they share a key; the key material itself never reaches the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// Lower-case hex of the first eight bytes of SHA-256 over the signing key.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use minipedia::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::derive_from(&[7_u8; 64]));
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
}
