pub mod ledger;
pub mod rewards;

pub use ledger::{
    GenesisAddresses, TokenLedger, ARCHIVING_REWARDS_POOL, COMMUNITY_RESERVE_POOL,
    DEVELOPMENT_POOL, PUBLIC_SALE_POOL,
};
pub use rewards::{
    calculate_archive_reward, calculate_bandwidth_reward, calculate_discovery_reward,
    calculate_storage_reward,
};
