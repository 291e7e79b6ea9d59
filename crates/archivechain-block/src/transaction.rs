use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use archivechain_archive::ArchiveData;
use archivechain_core::canonical::canonical_json_bytes;
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{Address, Timestamp, TxId};
use archivechain_crypto::{hash_for_signing, sign_value, KeyPair};
use archivechain_safemath::Amount;

/// Every state-changing operation this chain records (spec §3 "Transaction").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    Archive,
    Transfer,
    Reward,
    Stake,
    Unstake,
    Verify,
    Genesis,
    Mint,
    Burn,
    Fee,
}

impl TxType {
    /// Coinbase/system transaction types that do not require a sender signature.
    pub fn requires_signature(&self) -> bool {
        !matches!(self, TxType::Genesis | TxType::Reward | TxType::Mint | TxType::Burn)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_id: TxId,
    pub tx_type: TxType,
    #[serde(default)]
    pub archive_data: Option<ArchiveData>,
    pub sender: Address,
    #[serde(default)]
    pub receiver: Option<Address>,
    pub amount: Amount,
    pub fee: Amount,
    pub timestamp: Timestamp,
    /// Base64-encoded ECDSA signature. Empty for system transaction types.
    #[serde(default)]
    pub signature: String,
}

impl Transaction {
    /// Build an unsigned transaction body; `tx_id` and `signature` are filled
    /// in afterward by `finalize`/`sign`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_unsigned(
        tx_type: TxType,
        archive_data: Option<ArchiveData>,
        sender: Address,
        receiver: Option<Address>,
        amount: Amount,
        fee: Amount,
        timestamp: Timestamp,
    ) -> Self {
        let mut tx = Self {
            tx_id: TxId::from_hex(String::new()),
            tx_type,
            archive_data,
            sender,
            receiver,
            amount,
            fee,
            timestamp,
            signature: String::new(),
        };
        tx.tx_id = tx.compute_tx_id();
        tx
    }

    /// `serde_json::Value` of this transaction with `signature` excluded —
    /// the body that is hashed for `tx_id` and signed/verified. Exposed so
    /// the chain layer can verify `sender`'s signature against its key
    /// registry without this crate depending on the registry type.
    pub fn signing_value(&self) -> Result<serde_json::Value, ArchiveChainError> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| ArchiveChainError::Persistence(format!("transaction encode failed: {e}")))?;
        if let serde_json::Value::Object(map) = &mut value {
            map.remove("signature");
            map.remove("tx_id");
        }
        Ok(value)
    }

    fn compute_tx_id(&self) -> TxId {
        let value = self.signing_value().unwrap_or(serde_json::Value::Null);
        let bytes = canonical_json_bytes(&value).unwrap_or_default();
        TxId::from_hex(hex::encode(Sha256::digest(bytes)))
    }

    /// Sign this transaction with `keypair`; `keypair`'s address must equal `sender`.
    pub fn sign(&mut self, keypair: &KeyPair) -> Result<(), ArchiveChainError> {
        if keypair.address != self.sender {
            return Err(ArchiveChainError::AddressMismatch);
        }
        let value = self.signing_value()?;
        self.signature = sign_value(keypair, &value)?;
        Ok(())
    }

    /// Recompute the SHA-256 digest over the canonical, signature-excluded body.
    pub fn hash_for_signing(&self) -> Result<[u8; 32], ArchiveChainError> {
        let value = self.signing_value()?;
        hash_for_signing(&value, &[])
    }

    /// Structural validity: tx_id matches recomputed hash, and (for types that
    /// require one) a non-empty signature is present. Signature *verification*
    /// against a registered key happens one layer up, where the key registry lives.
    pub fn validate_structure(&self) -> Result<(), ArchiveChainError> {
        if self.compute_tx_id() != self.tx_id {
            return Err(ArchiveChainError::BlockInvalid(format!(
                "tx_id mismatch for {:?}",
                self.tx_id
            )));
        }
        if self.tx_type.requires_signature() && self.signature.trim().is_empty() {
            return Err(ArchiveChainError::InvalidSignature);
        }
        if let Some(archive) = &self.archive_data {
            archive.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_validate_round_trip() {
        let kp = KeyPair::generate();
        let mut tx = Transaction::new_unsigned(
            TxType::Transfer,
            None,
            kp.address.clone(),
            Some(Address::new("arc0000000000000000000000000000000000000a")),
            Amount::from_arc(10),
            Amount::from_arc(0),
            1_700_000_000,
        );
        tx.sign(&kp).unwrap();
        assert!(tx.validate_structure().is_ok());
    }

    #[test]
    fn system_transactions_do_not_require_signature() {
        let tx = Transaction::new_unsigned(
            TxType::Reward,
            None,
            Address::system("archiving_rewards"),
            Some(Address::new("arc0000000000000000000000000000000000000a")),
            Amount::from_arc(50),
            Amount::ZERO,
            1_700_000_000,
        );
        assert!(tx.validate_structure().is_ok());
    }
}
