//! PBKDF2-HMAC-SHA256 password hasher.
//!
//! Hashes are encoded as `pbkdf2_sha256$<iterations>$<salt hex>$<hash hex>`,
//! so the iteration count can be raised without invalidating stored hashes.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

const SCHEME: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 16;
const OUTPUT_LEN: usize = 32;

/// Default iteration count for new hashes.
pub const DEFAULT_ITERATIONS: u32 = 310_000;

/// [`PasswordHasher`] backed by PBKDF2 with HMAC-SHA256.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2PasswordHasher {
    iterations: u32,
}

impl Default for Pbkdf2PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl Pbkdf2PasswordHasher {
    /// Create a hasher deriving new hashes with `iterations` rounds.
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }
}

fn derive(secret: &[u8], salt: &[u8], iterations: u32) -> [u8; OUTPUT_LEN] {
    let mut out = [0_u8; OUTPUT_LEN];
    pbkdf2_hmac::<Sha256>(secret, salt, iterations, &mut out);
    out
}

struct Decoded {
    iterations: u32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

fn decode(encoded: &str) -> Result<Decoded, PasswordHasherError> {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(PasswordHasherError::malformed_hash("expected four fields"));
    };
    if scheme != SCHEME {
        return Err(PasswordHasherError::malformed_hash(format!(
            "unknown scheme {scheme}"
        )));
    }
    let iterations = iterations
        .parse::<u32>()
        .ok()
        .filter(|rounds| *rounds > 0)
        .ok_or_else(|| PasswordHasherError::malformed_hash("invalid iteration count"))?;
    let salt = hex::decode(salt)
        .map_err(|err| PasswordHasherError::malformed_hash(format!("salt: {err}")))?;
    let hash = hex::decode(hash)
        .map_err(|err| PasswordHasherError::malformed_hash(format!("hash: {err}")))?;
    Ok(Decoded {
        iterations,
        salt,
        hash,
    })
}

impl PasswordHasher for Pbkdf2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let mut salt = [0_u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        let derived = derive(password.as_bytes(), &salt, self.iterations);
        Ok(PasswordHash::new(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(derived)
        )))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let decoded = decode(hash.as_str())?;
        let derived = derive(password.as_bytes(), &decoded.salt, decoded.iterations);
        Ok(derived.as_slice().ct_eq(decoded.hash.as_slice()).into())
    }
}
