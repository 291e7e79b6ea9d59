//! ─── ArchiveChain Protocol Constants ────────────────────────────────────────
//!
//! A specialized ledger for web-archive commitments, secured by hybrid
//! Proof-of-Archive consensus and denominated in the fixed-supply ARC token.

// ── Supply & token (C4) ───────────────────────────────────────────────────────

/// Total fixed ARC supply, expressed in micro-ARC (1 ARC = 1_000_000 micro-ARC).
pub const TOTAL_SUPPLY_MICRO: u128 = 1_000_000_000_000_000;

/// 1 ARC expressed in micro-ARC (6 fractional digits).
pub const MICRO_PER_ARC: u128 = 1_000_000;

/// Archiving rewards pool share (40%).
pub const ARCHIVING_REWARDS_POOL_PERCENT: u128 = 40;
/// Development pool share (25%).
pub const DEVELOPMENT_POOL_PERCENT: u128 = 25;
/// Community reserve pool share (20%).
pub const COMMUNITY_RESERVE_POOL_PERCENT: u128 = 20;
/// Public sale pool share (15%).
pub const PUBLIC_SALE_POOL_PERCENT: u128 = 15;

/// Reward-rate bounds (ARC), scaled by `MICRO_PER_ARC` at use.
pub const INITIAL_ARCHIVE_REWARD_MIN: u128 = 100;
pub const INITIAL_ARCHIVE_REWARD_MAX: u128 = 500;
pub const STORAGE_REWARD_MIN: u128 = 10;
pub const STORAGE_REWARD_MAX: u128 = 50;
pub const BANDWIDTH_REWARD_MIN: u128 = 1;
pub const BANDWIDTH_REWARD_MAX: u128 = 5;
pub const DISCOVERY_REWARD_BASE: u128 = 25;
pub const DISCOVERY_REWARD_SPAN: u128 = 75;

/// Fraction of every transfer fee that is burned (10%).
pub const TRANSACTION_FEE_BURN_RATE_PERCENT: u128 = 10;

/// Mining reward paid to the block producer on each successfully mined block.
pub const MINING_REWARD_ARC: u128 = 50;

// ── SafeMath bounds (C2) ──────────────────────────────────────────────────────

pub const MAX_TOKEN_SUPPLY_ARC: u128 = 1_000_000_000;
pub const MAX_SINGLE_AMOUNT_ARC: u128 = 100_000_000;
pub const MAX_REWARD_AMOUNT_ARC: u128 = 10_000;
/// Minimum representable amount: 0.000001 ARC == 1 micro-ARC.
pub const MIN_AMOUNT_MICRO: u128 = 1;
pub const DECIMAL_PLACES: u32 = 6;

// ── Archive data (C3) ──────────────────────────────────────────────────────────

pub const MIN_REPLICATION_COUNT: u32 = 1;
pub const MAX_REPLICATION_COUNT: u32 = 15;
pub const DEFAULT_REPLICATION_COUNT: u32 = 3;
/// Popularity threshold against `replication_count` — see DESIGN.md for the
/// Open Question this resolves.
pub const POPULARITY_REPLICATION_THRESHOLD: u32 = 10;

// ── Crypto core (C1) ──────────────────────────────────────────────────────────

pub const PBKDF2_ITERATIONS: u32 = 100_000;
pub const SALT_LENGTH_BYTES: usize = 32;
pub const CHALLENGE_LENGTH_HEX: usize = 32;

// ── Merkle / block (C5) ───────────────────────────────────────────────────────

/// Upper bound on mining attempts before `mine_block` gives up (so tests and
/// adversarial difficulty settings cannot hang forever).
pub const MAX_MINING_ATTEMPTS: u64 = 1_000_000;

// ── Chain (C8) ─────────────────────────────────────────────────────────────────

pub const GENESIS_DIFFICULTY: u32 = 1;
pub const BLOCK_TIME_TARGET_SECS: i64 = 600;
pub const MAX_BLOCK_SIZE_BYTES: usize = 1024 * 1024;
pub const DIFFICULTY_ADJUSTMENT_WINDOW: usize = 10;

// ── Consensus — Proof-of-Archive (C6) ─────────────────────────────────────────

pub const STORAGE_WEIGHT: f64 = 0.5;
pub const BANDWIDTH_WEIGHT: f64 = 0.3;
pub const LONGEVITY_WEIGHT: f64 = 0.2;

pub const MIN_STORAGE_SIZE_BYTES: u64 = 1024 * 1024 * 1024; // 1 GiB
pub const MIN_BANDWIDTH_SERVED_BYTES: u64 = 100 * 1024 * 1024; // 100 MiB
pub const MIN_STORAGE_DURATION_SECS: i64 = 24 * 3600;
pub const MAX_RESPONSE_TIME_MS: u64 = 5_000;
pub const CHALLENGE_VALIDITY_SECS: i64 = 3600;
pub const PROOF_VALIDITY_PERIOD_SECS: i64 = 3600;

pub const PROOF_GC_MAX_AGE_SECS: i64 = 7 * 24 * 3600;
pub const LONGEVITY_PROOF_GC_MAX_AGE_SECS: i64 = 30 * 24 * 3600;

pub const VALIDATOR_CANDIDATE_SET_SIZE: usize = 20;
pub const MIN_ELIGIBLE_SCORE: f64 = 0.1;

// ── Smart contracts (C7) ──────────────────────────────────────────────────────

pub const BOUNTY_REQUIRED_VOTES: u32 = 3;
pub const PRESERVATION_DISTRIBUTION_WINDOW_SECS: i64 = 30 * 24 * 3600;
pub const VERIFICATION_THRESHOLD_VOTES: u32 = 3;
pub const VERIFIER_REPUTATION_MIN: f64 = 0.1;
pub const VERIFIER_REPUTATION_MAX: f64 = 2.0;
pub const VERIFIER_REPUTATION_DEFAULT: f64 = 1.0;
pub const VERIFIER_REPUTATION_STEP: f64 = 0.1;
pub const VERIFICATION_CONSENSUS_THRESHOLD: f64 = 0.6;

// ── Node view (C9) ─────────────────────────────────────────────────────────────

pub const DHT_ENTRY_STALE_SECS: i64 = 24 * 3600;
pub const PEER_TIMEOUT_SECS: i64 = 5 * 60;
pub const STORAGE_EVICTION_HIGH_WATERMARK: f64 = 0.9;
pub const STORAGE_EVICTION_LOW_WATERMARK: f64 = 0.8;
