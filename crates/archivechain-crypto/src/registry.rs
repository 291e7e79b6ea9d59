//! Public-key registry: which addresses have a registered verifying key.

use std::collections::HashMap;

use k256::ecdsa::VerifyingKey;
use serde_json::Value;

use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::Address;

use crate::address::address_matches;
use crate::signature::verify_value;

#[derive(Default)]
pub struct KeyRegistry {
    keys: HashMap<Address, VerifyingKey>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` for `address`. Rejected (`AddressMismatch`) if the
    /// address derived from `key` does not equal `address`.
    pub fn register(&mut self, address: Address, key: VerifyingKey) -> Result<(), ArchiveChainError> {
        if !address_matches(&address, &key) {
            return Err(ArchiveChainError::AddressMismatch);
        }
        self.keys.insert(address, key);
        Ok(())
    }

    pub fn get(&self, address: &Address) -> Option<&VerifyingKey> {
        self.keys.get(address)
    }

    pub fn is_registered(&self, address: &Address) -> bool {
        self.keys.contains_key(address)
    }

    pub fn registered_addresses(&self) -> impl Iterator<Item = &Address> {
        self.keys.keys()
    }

    /// Verify `data`/`signature` against `sender`'s registered key, failing
    /// with `UnregisteredAddress` if no key is on file.
    pub fn verify_transaction(
        &self,
        sender: &Address,
        data: &Value,
        signature: &str,
    ) -> Result<bool, ArchiveChainError> {
        let key = self
            .keys
            .get(sender)
            .ok_or_else(|| ArchiveChainError::UnregisteredAddress(sender.to_string()))?;
        verify_value(key, data, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::KeyPair;

    #[test]
    fn register_rejects_mismatched_address() {
        let kp = KeyPair::generate();
        let other = KeyPair::generate();
        let mut registry = KeyRegistry::new();
        let err = registry.register(other.address.clone(), kp.verifying_key);
        assert!(matches!(err, Err(ArchiveChainError::AddressMismatch)));
    }

    #[test]
    fn verify_transaction_fails_for_unregistered_sender() {
        let kp = KeyPair::generate();
        let registry = KeyRegistry::new();
        let data = serde_json::json!({"sender": kp.address.as_str()});
        let err = registry.verify_transaction(&kp.address, &data, "whatever");
        assert!(matches!(err, Err(ArchiveChainError::UnregisteredAddress(_))));
    }
}
