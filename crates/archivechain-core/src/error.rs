use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveChainError {
    // ── Crypto (C1) ───────────────────────────────────────────────────────────
    #[error("invalid signature")]
    InvalidSignature,

    #[error("address not registered: {0}")]
    UnregisteredAddress(String),

    #[error("challenge expired or already consumed")]
    ExpiredChallenge,

    #[error("derived address does not match claimed address")]
    AddressMismatch,

    // ── SafeMath (C2) ─────────────────────────────────────────────────────────
    #[error("amount overflow: {0}")]
    Overflow(String),

    #[error("amount underflow: {0}")]
    Underflow(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    // ── Archive data & index (C3) ─────────────────────────────────────────────
    #[error("invalid archive record: {0}")]
    InvalidArchive(String),

    #[error("archive already indexed for url: {0}")]
    DuplicateArchive(String),

    // ── Token ledger (C4) ─────────────────────────────────────────────────────
    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: String, have: String },

    #[error("insufficient staked balance: need {need}, have {have}")]
    InsufficientStake { need: String, have: String },

    #[error("reward pool exhausted: {0}")]
    PoolExhausted(String),

    // ── Consensus (C6) ────────────────────────────────────────────────────────
    #[error("node is not authorized to produce a block (score below threshold)")]
    UnauthorizedValidator,

    // ── Smart contracts (C7) ──────────────────────────────────────────────────
    #[error("contract not found: {0}")]
    ContractNotFound(String),

    #[error("invalid contract call: {0}")]
    InvalidContractCall(String),

    // ── Chain / block (C5, C8) ────────────────────────────────────────────────
    #[error("block invalid: {0}")]
    BlockInvalid(String),

    // ── Persistence (C8) ──────────────────────────────────────────────────────
    #[error("persistence error: {0}")]
    Persistence(String),

    // ── General ────────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}
