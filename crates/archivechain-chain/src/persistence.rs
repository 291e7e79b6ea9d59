//! JSON snapshot persistence (spec §6 "External Interfaces").
//!
//! The persisted key set is `{chain, pending_transactions, difficulty,
//! stats, token_system, genesis_address}` — `pending_transactions` on disk,
//! `mempool` in memory; the spec's own external-interfaces section (§6)
//! names the on-disk key differently than its internal state table (§4.8).
//! We keep the field name that reads better in code and match the wire
//! name only at the persistence boundary. See DESIGN.md.

use std::path::Path;

use serde::{Deserialize, Serialize};

use archivechain_block::{ArchiveBlock, Transaction};
use archivechain_core::error::ArchiveChainError;
use archivechain_token::{GenesisAddresses, TokenLedger};

use crate::chain::{ArchiveChain, ChainStats};
use crate::config::ChainConfig;

#[derive(Serialize, Deserialize)]
struct ChainSnapshot {
    config: ChainConfig,
    chain: Vec<ArchiveBlock>,
    pending_transactions: Vec<Transaction>,
    difficulty: u32,
    stats: ChainStats,
    token_system: TokenLedger,
    genesis_address: GenesisAddresses,
}

impl ArchiveChain {
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ArchiveChainError> {
        let snapshot = ChainSnapshot {
            config: self.config.clone(),
            chain: self.blocks().to_vec(),
            pending_transactions: self.pending_transactions().to_vec(),
            difficulty: self.difficulty(),
            stats: self.stats().clone(),
            token_system: self.ledger().clone(),
            genesis_address: self.genesis_addresses().clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| ArchiveChainError::Persistence(format!("snapshot encode failed: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| ArchiveChainError::Persistence(format!("snapshot write failed: {e}")))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ArchiveChainError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ArchiveChainError::Persistence(format!("snapshot read failed: {e}")))?;
        let snapshot: ChainSnapshot = serde_json::from_str(&json)
            .map_err(|e| ArchiveChainError::Persistence(format!("snapshot decode failed: {e}")))?;
        ArchiveChain::from_parts(
            snapshot.config,
            snapshot.chain,
            snapshot.pending_transactions,
            snapshot.difficulty,
            snapshot.token_system,
            snapshot.genesis_address,
            snapshot.stats,
        )
    }
}
