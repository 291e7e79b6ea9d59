//! Transaction/block signing and verification.
//!
//! Operates on `serde_json::Value` rather than a concrete `Transaction` type
//! so this crate has no dependency on `archivechain-block`; callers serialize
//! their struct to a `Value` first. `signature_fields_removed` documents the
//! one required precondition: the `signature` key (and any other signature
//! field named by the caller) must already be absent.

use base64::{engine::general_purpose::STANDARD, Engine};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};
use serde_json::Value;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use archivechain_core::canonical::canonical_json_bytes;
use archivechain_core::error::ArchiveChainError;

use crate::keypair::KeyPair;

/// Remove `signature` (and any caller-named fields) from a JSON object before
/// hashing, mirroring the protocol's "signature field excluded" rule.
fn strip_signature_fields(data: &Value, extra_fields: &[&str]) -> Value {
    let mut data = data.clone();
    if let Value::Object(map) = &mut data {
        map.remove("signature");
        for field in extra_fields {
            map.remove(*field);
        }
    }
    data
}

/// SHA-256 over the canonical JSON form of `data` with signature fields
/// excluded.
pub fn hash_for_signing(
    data: &Value,
    extra_excluded_fields: &[&str],
) -> Result<[u8; 32], ArchiveChainError> {
    let stripped = strip_signature_fields(data, extra_excluded_fields);
    let bytes = canonical_json_bytes(&stripped)?;
    Ok(Sha256::digest(bytes).into())
}

/// Sign `data` (with `signature` already absent or ignored) and return the
/// base64-encoded compact signature.
pub fn sign_value(keypair: &KeyPair, data: &Value) -> Result<String, ArchiveChainError> {
    let digest = hash_for_signing(data, &[])?;
    let sig = keypair.sign_prehash(&digest)?;
    Ok(STANDARD.encode(sig.to_bytes()))
}

/// Verify a single signature against the registered public key.
pub fn verify_value(
    verifying_key: &VerifyingKey,
    data: &Value,
    signature_b64: &str,
) -> Result<bool, ArchiveChainError> {
    let digest = hash_for_signing(data, &[])?;
    let sig_bytes = STANDARD
        .decode(signature_b64)
        .map_err(|_| ArchiveChainError::InvalidSignature)?;
    let signature =
        Signature::from_slice(&sig_bytes).map_err(|_| ArchiveChainError::InvalidSignature)?;
    Ok(verifying_key.verify_prehash(&digest, &signature).is_ok())
}

/// M-of-N multi-signature check: counts how many `(signature, verifying_key)`
/// pairs verify against `data`, requiring at least `required` valid ones.
/// `signatures` and `keys` must be the same length and positionally paired.
pub fn verify_multisig(
    data: &Value,
    signatures: &[String],
    keys: &[VerifyingKey],
    required: usize,
) -> Result<bool, ArchiveChainError> {
    if signatures.len() != keys.len() {
        return Ok(false);
    }
    let mut valid = 0usize;
    for (sig, key) in signatures.iter().zip(keys.iter()) {
        if verify_value(key, data, sig).unwrap_or(false) {
            valid += 1;
        }
    }
    Ok(valid >= required)
}

/// Constant-time equality over two byte strings. Used wherever a digest or
/// address comparison could otherwise leak timing information.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sign_and_verify_round_trip() {
        let kp = KeyPair::generate();
        let data = json!({"sender": kp.address.as_str(), "amount": "10.0", "signature": "stale"});
        let sig = sign_value(&kp, &data).unwrap();
        assert!(verify_value(&kp.verifying_key, &data, &sig).unwrap());
    }

    #[test]
    fn tampering_invalidates_signature() {
        let kp = KeyPair::generate();
        let data = json!({"sender": kp.address.as_str(), "amount": "10.0"});
        let sig = sign_value(&kp, &data).unwrap();
        let tampered = json!({"sender": kp.address.as_str(), "amount": "11.0"});
        assert!(!verify_value(&kp.verifying_key, &tampered, &sig).unwrap());
    }

    #[test]
    fn multisig_requires_threshold() {
        let kp1 = KeyPair::generate();
        let kp2 = KeyPair::generate();
        let kp3 = KeyPair::generate();
        let data = json!({"amount": "5.0"});
        let sig1 = sign_value(&kp1, &data).unwrap();
        let sig2 = sign_value(&kp2, &data).unwrap();
        let bad_sig = sign_value(&kp3, &json!({"amount": "999"})).unwrap();

        let sigs = vec![sig1, sig2, bad_sig];
        let keys = vec![kp1.verifying_key, kp2.verifying_key, kp3.verifying_key];
        assert!(verify_multisig(&data, &sigs, &keys, 2).unwrap());
        assert!(!verify_multisig(&data, &sigs, &keys, 3).unwrap());
    }
}
