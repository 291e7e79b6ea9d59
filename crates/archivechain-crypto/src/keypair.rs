use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::Address;

use crate::address::derive_address;

/// An ECDSA-secp256k1 keypair with a derived [`Address`].
///
/// The secret scalar is held in a `Zeroizing<Vec<u8>>` so it is wiped from
/// memory on drop, independent of whatever `k256` itself does internally.
pub struct KeyPair {
    pub address: Address,
    pub verifying_key: VerifyingKey,
    secret_key: Zeroizing<Vec<u8>>,
}

impl KeyPair {
    /// Generate a fresh keypair from the OS CSPRNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Restore a keypair from a raw 32-byte secret scalar.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, ArchiveChainError> {
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|e| ArchiveChainError::Other(format!("invalid secret key: {e}")))?;
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = VerifyingKey::from(&signing_key);
        let address = derive_address(&verifying_key);
        Self {
            address,
            verifying_key,
            secret_key: Zeroizing::new(signing_key.to_bytes().to_vec()),
        }
    }

    pub fn secret_key_bytes(&self) -> &[u8] {
        &self.secret_key
    }

    /// Sign a precomputed SHA-256 digest directly (no re-hashing).
    pub fn sign_prehash(&self, digest: &[u8; 32]) -> Result<Signature, ArchiveChainError> {
        let signing_key = SigningKey::from_slice(&self.secret_key)
            .map_err(|e| ArchiveChainError::Other(format!("corrupt secret key: {e}")))?;
        signing_key
            .sign_prehash(digest)
            .map_err(|e| ArchiveChainError::Other(format!("signing failed: {e}")))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyPair {{ address: {:?} }}", self.address)
    }
}
