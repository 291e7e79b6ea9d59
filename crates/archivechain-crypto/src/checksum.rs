//! PBKDF2-HMAC-SHA256 salted integrity checksums.
//!
//! Distinct from the storage-proof response hash in `archivechain-consensus`
//! (a raw, unsalted `SHA-256(checksum ‖ challenge)`) — this salted form is the
//! archive integrity checksum carried in `ArchiveMetadata`.

use std::collections::HashMap;

use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use archivechain_core::constants::{PBKDF2_ITERATIONS, SALT_LENGTH_BYTES};

const CHECKSUM_PREFIX: &str = "pbkdf2_sha256_";

/// Derive the salted checksum for `data` under `salt`, formatted as
/// `pbkdf2_sha256_<hex>`.
pub fn compute_checksum(data: &[u8], salt: &[u8]) -> String {
    let mut output = [0u8; 32];
    pbkdf2::<Hmac<Sha256>>(data, salt, PBKDF2_ITERATIONS, &mut output)
        .expect("HMAC output length is always valid for PBKDF2");
    format!("{CHECKSUM_PREFIX}{}", hex::encode(output))
}

/// Verify `data` against a previously computed `expected` checksum.
pub fn verify_checksum(data: &[u8], salt: &[u8], expected: &str) -> bool {
    crate::signature::constant_time_eq(compute_checksum(data, salt).as_bytes(), expected.as_bytes())
}

fn fresh_salt() -> [u8; SALT_LENGTH_BYTES] {
    let mut salt = [0u8; SALT_LENGTH_BYTES];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Per-identifier salt cache: each archive/identifier gets one CSPRNG-drawn
/// salt, reused for every subsequent checksum of that identifier so that
/// checksums recomputed from the same content are reproducible.
#[derive(Default)]
pub struct SaltCache {
    salts: HashMap<String, [u8; SALT_LENGTH_BYTES]>,
}

impl SaltCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached salt for `identifier`, drawing a fresh one on first use.
    pub fn salt_for(&mut self, identifier: &str) -> [u8; SALT_LENGTH_BYTES] {
        *self
            .salts
            .entry(identifier.to_string())
            .or_insert_with(fresh_salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_has_tagged_format() {
        let salt = fresh_salt();
        let checksum = compute_checksum(b"hello world", &salt);
        assert!(checksum.starts_with(CHECKSUM_PREFIX));
    }

    #[test]
    fn verify_detects_tampering() {
        let salt = fresh_salt();
        let checksum = compute_checksum(b"hello world", &salt);
        assert!(verify_checksum(b"hello world", &salt, &checksum));
        assert!(!verify_checksum(b"goodbye world", &salt, &checksum));
    }

    #[test]
    fn salt_cache_is_stable_per_identifier() {
        let mut cache = SaltCache::new();
        let first = cache.salt_for("archive-1");
        let second = cache.salt_for("archive-1");
        assert_eq!(first, second);
        let other = cache.salt_for("archive-2");
        assert_ne!(first, other);
    }
}
