//! Secure challenge generation for storage-proof requests.
//!
//! `SHA-256(node_id ‖ archive_id ‖ now ‖ csprng_bytes)[..32]`, using the OS
//! CSPRNG — never a non-cryptographic PRNG (`rand::rngs::StdRng`/`rand::thread_rng`
//! backed by a fast non-crypto generator would violate this).

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use archivechain_core::types::{NodeId, Timestamp};

/// Generate a fresh 32-byte storage challenge, hex-encoded.
pub fn generate_challenge(node_id: &NodeId, archive_id: &str, now: Timestamp) -> String {
    let mut csprng_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut csprng_bytes);

    let mut hasher = Sha256::new();
    hasher.update(node_id.as_str().as_bytes());
    hasher.update(archive_id.as_bytes());
    hasher.update(now.to_le_bytes());
    hasher.update(csprng_bytes);
    let digest = hasher.finalize();

    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenges_are_unique() {
        let node = NodeId::new("node-1");
        let a = generate_challenge(&node, "archive-1", 1000);
        let b = generate_challenge(&node, "archive-1", 1000);
        assert_ne!(a, b, "CSPRNG-derived challenges must not repeat");
        assert_eq!(a.len(), 64);
    }
}
