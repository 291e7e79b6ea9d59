//! The chain orchestrator (C8): genesis, mempool admission, mining,
//! validation, and the typed operations every collaborator calls into.
//! Single-writer per chain (spec §5): every `&mut self` method here runs
//! serially; read-only queries take `&self`.

use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use archivechain_archive::{ArchiveData, ArchiveIndex};
use archivechain_block::{ArchiveBlock, Block, Transaction, TxType};
use archivechain_consensus::{BandwidthProof, LongevityProof, ProofOfArchive, StorageProof};
use archivechain_contracts::ContractRegistry;
use archivechain_core::constants::DIFFICULTY_ADJUSTMENT_WINDOW;
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{Address, NodeId, Timestamp, TxId};
use archivechain_crypto::KeyRegistry;
use archivechain_safemath::Amount;
use archivechain_token::{GenesisAddresses, TokenLedger, ARCHIVING_REWARDS_POOL};

use crate::config::ChainConfig;

/// Rolling, non-authoritative chain statistics (part of the persisted
/// snapshot's `stats` object, spec §6).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChainStats {
    pub total_rewards_distributed: Amount,
    pub archives_stored: u64,
    pub blocks_mined: u64,
}

pub struct ArchiveChain {
    pub config: ChainConfig,
    chain: Vec<ArchiveBlock>,
    mempool: Vec<Transaction>,
    difficulty: u32,
    ledger: TokenLedger,
    genesis_addresses: GenesisAddresses,
    key_registry: KeyRegistry,
    archive_index: ArchiveIndex,
    contracts: ContractRegistry,
    poa: ProofOfArchive,
    stats: ChainStats,
}

impl ArchiveChain {
    /// Build block 0: a single `genesis` transaction to `config.genesis_address`,
    /// mined at `config.initial_difficulty`, with pool seeding from §4.4.
    pub fn genesis(
        config: ChainConfig,
        genesis_addresses: GenesisAddresses,
        now: Timestamp,
    ) -> Result<Self, ArchiveChainError> {
        let ledger = TokenLedger::genesis(&genesis_addresses)?;

        let genesis_tx = Transaction::new_unsigned(
            TxType::Genesis,
            None,
            config.genesis_address.clone(),
            Some(config.genesis_address.clone()),
            Amount::ZERO,
            Amount::ZERO,
            now,
        );
        let mut block = Block::new_unmined(
            archivechain_core::types::BlockHash::zero(),
            vec![genesis_tx],
            config.initial_difficulty,
            0,
            now,
        )?;
        block.mine(&AtomicBool::new(false))?;

        Ok(Self {
            difficulty: config.initial_difficulty,
            chain: vec![ArchiveBlock::from_block(block)],
            mempool: Vec::new(),
            ledger,
            genesis_addresses,
            key_registry: KeyRegistry::new(),
            archive_index: ArchiveIndex::new(),
            contracts: ContractRegistry::new(),
            poa: ProofOfArchive::new(),
            stats: ChainStats::default(),
            config,
        })
    }

    pub fn register_key(
        &mut self,
        address: Address,
        key: k256::ecdsa::VerifyingKey,
    ) -> Result<(), ArchiveChainError> {
        self.key_registry.register(address, key)
    }

    fn verify_signature(&self, tx: &Transaction) -> Result<(), ArchiveChainError> {
        if !tx.tx_type.requires_signature() {
            return Ok(());
        }
        let value = tx.signing_value()?;
        let ok = self.key_registry.verify_transaction(&tx.sender, &value, &tx.signature)?;
        if !ok {
            return Err(ArchiveChainError::InvalidSignature);
        }
        Ok(())
    }

    // ── Archives ──────────────────────────────────────────────────────────

    /// Validate, dedupe, sign-check, credit the archiver via the
    /// initial-archive reward, and enqueue. Nothing mutates unless every
    /// precondition passes (spec §7 propagation rule).
    pub fn add_archive(
        &mut self,
        archive: ArchiveData,
        archiver: Address,
        signature: String,
        rarity_score: f64,
        now: Timestamp,
    ) -> Result<TxId, ArchiveChainError> {
        archive.validate()?;
        if self.archive_index.find_by_url(&archive.original_url).is_some() {
            return Err(ArchiveChainError::DuplicateArchive(archive.original_url.clone()));
        }

        let reward = archivechain_token::calculate_archive_reward(
            archive.size_compressed,
            rarity_score,
            &archive.content_type,
        )?;

        let mut tx = Transaction::new_unsigned(
            TxType::Archive,
            Some(archive.clone()),
            archiver.clone(),
            None,
            reward,
            Amount::ZERO,
            now,
        );
        tx.signature = signature;
        tx.validate_structure()?;
        self.verify_signature(&tx)?;

        let paid = self.ledger.pay_reward(ARCHIVING_REWARDS_POOL, &archiver, reward)?;
        self.archive_index.add_archive(&archive)?;
        self.stats.archives_stored += 1;
        self.stats.total_rewards_distributed =
            archivechain_safemath::safe_add(self.stats.total_rewards_distributed, paid)?;

        let tx_id = tx.tx_id.clone();
        self.mempool.push(tx);
        tracing::info!(archive_id = %archive.archive_id, %reward, "archive admitted to mempool");
        Ok(tx_id)
    }

    pub fn search_archives(&self, query: &str) -> Vec<archivechain_core::types::ArchiveId> {
        self.archive_index.search(query)
    }

    pub fn get_archive_by_url(&self, url: &str) -> Option<archivechain_core::types::ArchiveId> {
        self.archive_index.find_by_url(url).cloned()
    }

    // ── Tokens ────────────────────────────────────────────────────────────

    pub fn get_balance(&self, address: &Address) -> Amount {
        self.ledger.balance_of(address)
    }

    pub fn transfer_tokens(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
        fee: Amount,
        signature: String,
        now: Timestamp,
    ) -> Result<TxId, ArchiveChainError> {
        let mut tx = Transaction::new_unsigned(
            TxType::Transfer,
            None,
            from.clone(),
            Some(to.clone()),
            amount,
            fee,
            now,
        );
        tx.signature = signature;
        tx.validate_structure()?;
        self.verify_signature(&tx)?;

        self.ledger.transfer(&from, &to, amount, fee)?;
        let tx_id = tx.tx_id.clone();
        self.mempool.push(tx);
        Ok(tx_id)
    }

    pub fn total_minted(&self) -> Amount {
        self.ledger.total_minted()
    }

    pub fn total_burned(&self) -> Amount {
        self.ledger.total_burned()
    }

    pub fn conservation_total(&self) -> Result<Amount, ArchiveChainError> {
        self.ledger.conservation_total()
    }

    pub fn stake(
        &mut self,
        address: Address,
        amount: Amount,
        signature: String,
        now: Timestamp,
    ) -> Result<TxId, ArchiveChainError> {
        let mut tx = Transaction::new_unsigned(
            TxType::Stake,
            None,
            address.clone(),
            None,
            amount,
            Amount::ZERO,
            now,
        );
        tx.signature = signature;
        tx.validate_structure()?;
        self.verify_signature(&tx)?;
        self.ledger.stake(&address, amount)?;
        let tx_id = tx.tx_id.clone();
        self.mempool.push(tx);
        Ok(tx_id)
    }

    pub fn unstake(
        &mut self,
        address: Address,
        amount: Amount,
        signature: String,
        now: Timestamp,
    ) -> Result<TxId, ArchiveChainError> {
        let mut tx = Transaction::new_unsigned(
            TxType::Unstake,
            None,
            address.clone(),
            None,
            amount,
            Amount::ZERO,
            now,
        );
        tx.signature = signature;
        tx.validate_structure()?;
        self.verify_signature(&tx)?;
        self.ledger.unstake(&address, amount)?;
        let tx_id = tx.tx_id.clone();
        self.mempool.push(tx);
        Ok(tx_id)
    }

    // ── Proof-of-Archive ──────────────────────────────────────────────────

    pub fn generate_storage_challenge(
        &mut self,
        node_id: NodeId,
        archive_id: String,
        now: Timestamp,
    ) -> String {
        self.poa.generate_storage_challenge(node_id, archive_id, now)
    }

    pub fn submit_storage_proof(
        &mut self,
        proof: StorageProof,
        now: Timestamp,
    ) -> Result<bool, ArchiveChainError> {
        self.poa.verify_storage_proof(proof, now)
    }

    pub fn submit_bandwidth_proof(&mut self, proof: BandwidthProof) -> Result<bool, ArchiveChainError> {
        self.poa.verify_bandwidth_proof(proof)
    }

    pub fn submit_longevity_proof(&mut self, proof: LongevityProof) -> Result<bool, ArchiveChainError> {
        self.poa.verify_longevity_proof(proof)
    }

    // ── Contracts ─────────────────────────────────────────────────────────

    /// `deploy_contract(type, params, creator)`. `type` is one of
    /// `"ArchiveBounty" | "PreservationPool" | "ContentVerification"`.
    pub fn deploy_contract(
        &mut self,
        contract_type: &str,
        contract_id: String,
        creator: Address,
        params: Value,
        now: Timestamp,
    ) -> Result<String, ArchiveChainError> {
        match contract_type {
            "ArchiveBounty" => {
                let target_url = param_str(&params, "target_url")?;
                let reward = Amount::parse_arc_str(&param_str(&params, "reward")?)?;
                let deadline = param_i64(&params, "deadline")?;
                self.ledger.escrow(&creator, reward)?;
                self.contracts
                    .deploy_bounty(contract_id, creator, target_url, reward, deadline, now)
            }
            "PreservationPool" => {
                let target_archives: Vec<String> = params
                    .get("target_archives")
                    .and_then(Value::as_array)
                    .map(|v| v.iter().filter_map(|x| x.as_str().map(str::to_string)).collect())
                    .ok_or_else(|| ArchiveChainError::InvalidContractCall("missing param: target_archives".into()))?;
                let initial_funding = Amount::parse_arc_str(&param_str(&params, "initial_funding")?)?;
                self.ledger.escrow(&creator, initial_funding)?;
                self.contracts
                    .deploy_pool(contract_id, creator, target_archives, initial_funding, now)
            }
            "ContentVerification" => self.contracts.deploy_verification(contract_id, creator, now),
            other => Err(ArchiveChainError::InvalidContractCall(format!("unknown contract type: {other}"))),
        }
    }

    /// Dispatch a contract call, then apply any escrow release/refund the
    /// contract's result names (the contract layer never touches the ledger
    /// directly; see `archivechain_contracts::bounty`).
    pub fn execute_contract(
        &mut self,
        contract_id: &str,
        function_name: &str,
        params: Value,
        caller: &Address,
        now: Timestamp,
    ) -> Result<Value, ArchiveChainError> {
        let result = self
            .contracts
            .execute_contract(contract_id, function_name, params, caller, now)?;

        if let Some(payout) = result.get("payout").and_then(Value::as_object) {
            self.apply_escrow_release(payout)?;
        }
        if let Some(refund) = result.get("refund").and_then(Value::as_object) {
            self.apply_escrow_release(refund)?;
        }
        Ok(result)
    }

    fn apply_escrow_release(&mut self, obj: &serde_json::Map<String, Value>) -> Result<(), ArchiveChainError> {
        let to = obj
            .get("to")
            .and_then(Value::as_str)
            .ok_or_else(|| ArchiveChainError::Persistence("malformed escrow release".into()))?;
        let amount = obj
            .get("amount")
            .and_then(Value::as_str)
            .ok_or_else(|| ArchiveChainError::Persistence("malformed escrow release".into()))?;
        self.ledger.release_escrow(&Address::new(to), Amount::parse_arc_str(amount)?)
    }

    pub fn register_node(&mut self, node_id: NodeId) -> bool {
        // Node registration proper lives in archivechain-node (C9); at the
        // chain layer this just means the node is now eligible to accrue
        // PoA score, which happens lazily as it submits proofs.
        !node_id.as_str().is_empty()
    }

    // ── Mining & validation ───────────────────────────────────────────────

    /// Gated by `validate_block_creation_right`; packs mempool transactions
    /// up to `max_block_size_bytes`, appends a coinbase reward, and mines.
    /// Returns `Ok(None)` on any gating or mining failure (mempool untouched).
    pub fn mine_block(&mut self, miner: Address, now: Timestamp) -> Result<Option<Block>, ArchiveChainError> {
        let node_id = NodeId::new(miner.as_str());
        if self.poa.validate_block_creation_right(&node_id, 24.0, now).is_err() {
            tracing::warn!(miner = %miner.as_str(), "block-creation right denied, PoA score too low");
            return Ok(None);
        }

        let available = self.ledger.pool_balance(ARCHIVING_REWARDS_POOL);
        if available == Amount::ZERO {
            return Ok(None);
        }
        let reward = if self.config.mining_reward > available {
            available
        } else {
            self.config.mining_reward
        };

        let mut packed = Vec::new();
        let mut packed_size = 0usize;
        for tx in &self.mempool {
            let size = archivechain_core::canonical::canonical_json_bytes(tx)?.len();
            if packed_size + size > self.config.max_block_size_bytes {
                break;
            }
            packed.push(tx.clone());
            packed_size += size;
        }

        let coinbase = Transaction::new_unsigned(
            TxType::Reward,
            None,
            Address::system(ARCHIVING_REWARDS_POOL),
            Some(miner.clone()),
            reward,
            Amount::ZERO,
            now,
        );
        let mut transactions = packed.clone();
        transactions.push(coinbase);

        let previous_hash = self.chain.last().expect("genesis always present").block.hash.clone();
        let block_height = self.chain.len() as u64;
        let mut block =
            Block::new_unmined(previous_hash, transactions, self.difficulty, block_height, now)?;

        let cancel = AtomicBool::new(false);
        if block.mine(&cancel).is_err() {
            tracing::warn!("mining failed to meet difficulty within attempt budget");
            return Ok(None);
        }

        self.ledger.pay_reward(ARCHIVING_REWARDS_POOL, &miner, reward)?;
        self.mempool.drain(0..packed.len());
        self.chain.push(ArchiveBlock::from_block(block.clone()));
        self.stats.blocks_mined += 1;
        self.stats.total_rewards_distributed =
            archivechain_safemath::safe_add(self.stats.total_rewards_distributed, reward)?;
        self.adjust_difficulty();

        tracing::info!(height = block_height, %reward, "block mined");
        Ok(Some(block))
    }

    /// Rolling adjustment over the last `DIFFICULTY_ADJUSTMENT_WINDOW` block
    /// intervals once that many blocks exist (spec §4.8).
    fn adjust_difficulty(&mut self) {
        if self.chain.len() <= DIFFICULTY_ADJUSTMENT_WINDOW {
            return;
        }
        let recent = &self.chain[self.chain.len() - DIFFICULTY_ADJUSTMENT_WINDOW - 1..];
        let mut total_interval = 0i64;
        for pair in recent.windows(2) {
            total_interval += pair[1].block.header.timestamp - pair[0].block.header.timestamp;
        }
        let avg_interval = total_interval as f64 / DIFFICULTY_ADJUSTMENT_WINDOW as f64;
        let target = self.config.block_time_target_secs as f64;

        if avg_interval < 0.8 * target {
            self.difficulty += 1;
        } else if avg_interval > 1.2 * target {
            self.difficulty = self.difficulty.saturating_sub(1).max(1);
        }
    }

    pub fn validate_chain(&self) -> bool {
        for (i, block) in self.chain.iter().enumerate() {
            if block.block.validate().is_err() {
                return false;
            }
            if i > 0 && block.block.header.previous_hash != self.chain[i - 1].block.hash {
                return false;
            }
        }
        true
    }

    pub fn chain_length(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn stats(&self) -> &ChainStats {
        &self.stats
    }

    pub fn mempool_len(&self) -> usize {
        self.mempool.len()
    }

    pub(crate) fn blocks(&self) -> &[ArchiveBlock] {
        &self.chain
    }

    pub(crate) fn pending_transactions(&self) -> &[Transaction] {
        &self.mempool
    }

    pub(crate) fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub(crate) fn genesis_addresses(&self) -> &GenesisAddresses {
        &self.genesis_addresses
    }

    pub(crate) fn from_parts(
        config: ChainConfig,
        chain: Vec<ArchiveBlock>,
        mempool: Vec<Transaction>,
        difficulty: u32,
        ledger: TokenLedger,
        genesis_addresses: GenesisAddresses,
        stats: ChainStats,
    ) -> Result<Self, ArchiveChainError> {
        let archives: Vec<ArchiveData> = chain
            .iter()
            .flat_map(|b| b.block.transactions.iter())
            .filter(|tx| tx.tx_type == TxType::Archive)
            .filter_map(|tx| tx.archive_data.clone())
            .collect();
        let archive_index = ArchiveIndex::rebuild(&archives)?;

        Ok(Self {
            config,
            chain,
            mempool,
            difficulty,
            ledger,
            genesis_addresses,
            key_registry: KeyRegistry::new(),
            archive_index,
            contracts: ContractRegistry::new(),
            poa: ProofOfArchive::new(),
            stats,
        })
    }
}

fn param_str(params: &Value, key: &str) -> Result<String, ArchiveChainError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ArchiveChainError::InvalidContractCall(format!("missing param: {key}")))
}

fn param_i64(params: &Value, key: &str) -> Result<i64, ArchiveChainError> {
    params
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ArchiveChainError::InvalidContractCall(format!("missing param: {key}")))
}

