//! Address derivation: `arc` + first 20 bytes of `SHA-256(SHA-256(pubkey))`.

use k256::ecdsa::VerifyingKey;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use archivechain_core::types::Address;

const ADDRESS_PREFIX: &str = "arc";
const ADDRESS_HASH_BYTES: usize = 20;

/// Derive the canonical address for an uncompressed secp256k1 public key.
pub fn derive_address(verifying_key: &VerifyingKey) -> Address {
    let uncompressed = verifying_key.to_encoded_point(false);
    let once = Sha256::digest(uncompressed.as_bytes());
    let twice = Sha256::digest(once);
    Address::new(format!(
        "{ADDRESS_PREFIX}{}",
        hex::encode(&twice[..ADDRESS_HASH_BYTES])
    ))
}

/// Constant-time check that a claimed address matches the one derived from `key`.
pub fn address_matches(claimed: &Address, key: &VerifyingKey) -> bool {
    let derived = derive_address(key);
    let a = claimed.as_str().as_bytes();
    let b = derived.as_str().as_bytes();
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    #[test]
    fn derived_address_has_expected_shape() {
        let sk = SigningKey::random(&mut OsRng);
        let vk = VerifyingKey::from(&sk);
        let addr = derive_address(&vk);
        assert!(addr.as_str().starts_with("arc"));
        assert_eq!(addr.as_str().len(), 3 + ADDRESS_HASH_BYTES * 2);
    }

    #[test]
    fn address_matches_is_sensitive_to_key() {
        let sk1 = SigningKey::random(&mut OsRng);
        let sk2 = SigningKey::random(&mut OsRng);
        let vk1 = VerifyingKey::from(&sk1);
        let vk2 = VerifyingKey::from(&sk2);
        let addr1 = derive_address(&vk1);
        assert!(address_matches(&addr1, &vk1));
        assert!(!address_matches(&addr1, &vk2));
    }
}
