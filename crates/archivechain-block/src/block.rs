use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use archivechain_core::canonical::canonical_json_bytes;
use archivechain_core::constants::MAX_MINING_ATTEMPTS;
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{ArchiveId, BlockHash, NodeId, Timestamp};

use crate::merkle::MerkleTree;
use crate::transaction::{Transaction, TxType};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockHeader {
    pub previous_hash: BlockHash,
    pub merkle_root: String,
    pub timestamp: Timestamp,
    pub nonce: u64,
    pub difficulty: u32,
    pub block_height: u64,
    pub version: u32,
}

impl BlockHeader {
    /// SHA-256 of the canonical header serialization, hex-encoded.
    pub fn compute_hash(&self) -> Result<BlockHash, ArchiveChainError> {
        let bytes = canonical_json_bytes(self)?;
        Ok(BlockHash::from_hex(hex::encode(Sha256::digest(bytes))))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
    pub hash: BlockHash,
}

impl Block {
    /// Assemble an unmined block (nonce = 0, `hash` left stale) ready for `mine`.
    pub fn new_unmined(
        previous_hash: BlockHash,
        transactions: Vec<Transaction>,
        difficulty: u32,
        block_height: u64,
        timestamp: Timestamp,
    ) -> Result<Self, ArchiveChainError> {
        let merkle_root = MerkleTree::build(&transactions).root_hex();
        let header = BlockHeader {
            previous_hash,
            merkle_root,
            timestamp,
            nonce: 0,
            difficulty,
            block_height,
            version: 1,
        };
        let hash = header.compute_hash()?;
        Ok(Self {
            header,
            transactions,
            hash,
        })
    }

    fn meets_difficulty(hash: &BlockHash, difficulty: u32) -> bool {
        let target_prefix = "0".repeat(difficulty as usize);
        hash.as_str().starts_with(&target_prefix)
    }

    /// Increment `nonce` until the header hash meets the difficulty target,
    /// cooperatively cancellable via `cancel` (checked every iteration so a
    /// long-running mining loop can be stopped from another thread). Returns
    /// `BlockInvalid` if `MAX_MINING_ATTEMPTS` is exhausted first.
    pub fn mine(&mut self, cancel: &AtomicBool) -> Result<(), ArchiveChainError> {
        for attempt in 0..MAX_MINING_ATTEMPTS {
            if cancel.load(Ordering::Relaxed) {
                return Err(ArchiveChainError::BlockInvalid("mining cancelled".into()));
            }
            self.header.nonce = attempt;
            let hash = self.header.compute_hash()?;
            if Self::meets_difficulty(&hash, self.header.difficulty) {
                self.hash = hash;
                return Ok(());
            }
        }
        Err(ArchiveChainError::BlockInvalid(format!(
            "exhausted {MAX_MINING_ATTEMPTS} mining attempts at difficulty {}",
            self.header.difficulty
        )))
    }

    /// Recomputed hash equals stored hash, hash meets difficulty, Merkle root
    /// matches, and every transaction is individually well-formed.
    pub fn validate(&self) -> Result<(), ArchiveChainError> {
        let recomputed = self.header.compute_hash()?;
        if recomputed != self.hash {
            return Err(ArchiveChainError::BlockInvalid("stored hash mismatch".into()));
        }
        if !Self::meets_difficulty(&self.hash, self.header.difficulty) {
            return Err(ArchiveChainError::BlockInvalid(
                "hash does not meet difficulty target".into(),
            ));
        }
        let recomputed_root = MerkleTree::build(&self.transactions).root_hex();
        if recomputed_root != self.header.merkle_root {
            return Err(ArchiveChainError::BlockInvalid("merkle root mismatch".into()));
        }
        for tx in &self.transactions {
            tx.validate_structure()?;
        }
        Ok(())
    }
}

/// A mined block plus derived indices over its archive transactions — a
/// cache, never authoritative: always reconstructible from `block.transactions`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveBlock {
    pub block: Block,
    pub archive_count: u64,
    pub total_archive_size: u64,
    pub content_index: HashMap<String, Vec<ArchiveId>>,
    pub replication_info: HashMap<ArchiveId, Vec<NodeId>>,
    /// Opaque identifiers of storage proofs logged against this block;
    /// the proof records themselves live in the consensus layer's proof store.
    pub storage_proof_ids: Vec<String>,
}

impl ArchiveBlock {
    pub fn from_block(block: Block) -> Self {
        let mut archive_count = 0u64;
        let mut total_archive_size = 0u64;
        let mut content_index: HashMap<String, Vec<ArchiveId>> = HashMap::new();
        let mut replication_info: HashMap<ArchiveId, Vec<NodeId>> = HashMap::new();

        for tx in &block.transactions {
            if tx.tx_type != TxType::Archive {
                continue;
            }
            if let Some(archive) = &tx.archive_data {
                archive_count += 1;
                total_archive_size += archive.size_compressed;
                content_index
                    .entry(archive.content_type.clone())
                    .or_default()
                    .push(archive.archive_id.clone());
                replication_info
                    .insert(archive.archive_id.clone(), archive.storage_nodes.clone());
            }
        }

        Self {
            block,
            archive_count,
            total_archive_size,
            content_index,
            replication_info,
            storage_proof_ids: Vec::new(),
        }
    }

    pub fn recompute_cache(&mut self) {
        *self = Self::from_block(self.block.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivechain_core::types::Address;
    use archivechain_safemath::Amount;
    use std::sync::atomic::AtomicBool;

    fn reward_tx() -> Transaction {
        Transaction::new_unsigned(
            TxType::Reward,
            None,
            Address::system("archiving_rewards"),
            Some(Address::new("arc0000000000000000000000000000000000000a")),
            Amount::from_arc(50),
            Amount::ZERO,
            1_700_000_000,
        )
    }

    #[test]
    fn mine_then_validate_round_trip() {
        let mut block =
            Block::new_unmined(BlockHash::zero(), vec![reward_tx()], 1, 1, 1_700_000_100).unwrap();
        let cancel = AtomicBool::new(false);
        block.mine(&cancel).unwrap();
        assert!(block.validate().is_ok());
        assert!(block.hash.as_str().starts_with('0'));
    }

    #[test]
    fn tampered_transactions_fail_validation() {
        let mut block =
            Block::new_unmined(BlockHash::zero(), vec![reward_tx()], 1, 1, 1_700_000_100).unwrap();
        let cancel = AtomicBool::new(false);
        block.mine(&cancel).unwrap();
        block.transactions.push(reward_tx());
        assert!(block.validate().is_err());
    }

    #[test]
    fn archive_block_cache_counts_archive_transactions_only() {
        let block =
            Block::new_unmined(BlockHash::zero(), vec![reward_tx()], 1, 1, 1_700_000_100).unwrap();
        let archive_block = ArchiveBlock::from_block(block);
        assert_eq!(archive_block.archive_count, 0);
    }
}
