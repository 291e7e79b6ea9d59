//! The local slice of the content-discovery DHT: `archive_id` hashed down to
//! an 8-hex-char key, mapping to the node IDs known to provide it.

use sha2::{Digest, Sha256};

/// `SHA-256(archive_id)` truncated to its first 8 hex characters (4 bytes),
/// matching the original's `hashlib.sha256(...).hexdigest()[:8]`.
pub fn dht_key(archive_id: &str) -> String {
    let digest = Sha256::digest(archive_id.as_bytes());
    hex::encode(digest)[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dht_key_is_eight_hex_chars() {
        let key = dht_key("archive-123");
        assert_eq!(key.len(), 8);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn dht_key_is_deterministic() {
        assert_eq!(dht_key("same"), dht_key("same"));
        assert_ne!(dht_key("a"), dht_key("b"));
    }
}
