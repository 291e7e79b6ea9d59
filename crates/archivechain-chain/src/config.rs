use serde::{Deserialize, Serialize};

use archivechain_core::constants::{
    BLOCK_TIME_TARGET_SECS, GENESIS_DIFFICULTY, MAX_BLOCK_SIZE_BYTES, MINING_REWARD_ARC,
};
use archivechain_core::types::Address;
use archivechain_safemath::Amount;

/// Chain construction parameters, threaded explicitly rather than read from
/// process-wide mutable singletons (spec §9, "Global mutable state").
/// Grounded on the teacher's `chronx-genesis::GenesisParams` convention.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainConfig {
    pub genesis_address: Address,
    pub initial_difficulty: u32,
    pub block_time_target_secs: i64,
    pub max_block_size_bytes: usize,
    pub mining_reward: Amount,
}

impl ChainConfig {
    pub fn new(genesis_address: Address) -> Self {
        Self {
            genesis_address,
            initial_difficulty: GENESIS_DIFFICULTY,
            block_time_target_secs: BLOCK_TIME_TARGET_SECS,
            max_block_size_bytes: MAX_BLOCK_SIZE_BYTES,
            mining_reward: Amount::from_arc(MINING_REWARD_ARC),
        }
    }
}
