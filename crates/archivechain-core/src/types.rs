use serde::{Deserialize, Serialize};
use std::fmt;

/// Unix timestamp (seconds, UTC). Used for block headers and consensus proofs.
pub type Timestamp = i64;

// ── Address ──────────────────────────────────────────────────────────────────

/// An ArchiveChain address: `arc` followed by 20 bytes (40 hex chars) derived
/// from a public key (see `archivechain-crypto::derive_address`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Wrap an already-formatted `arc…` string without validation.
    /// Callers constructing addresses from key material should use
    /// `archivechain_crypto::derive_address` instead.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reserved addresses for pool / system accounts that never hold a keypair.
    pub fn system(name: &str) -> Self {
        Self(format!("sys:{name}"))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ── TxId ─────────────────────────────────────────────────────────────────────

/// A transaction identifier: SHA-256 of the canonical transaction body, hex-encoded.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId(pub String);

impl TxId {
    pub fn from_hex(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = &self.0.get(..12).unwrap_or(&self.0);
        write!(f, "TxId({short}…)")
    }
}

// ── BlockHash ────────────────────────────────────────────────────────────────

/// A block header hash: SHA-256 hex digest.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHash(pub String);

impl BlockHash {
    pub fn from_hex(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The all-zero hash used as `previous_hash` for the genesis block.
    pub fn zero() -> Self {
        Self("0".repeat(64))
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({}…)", &self.0.get(..12).unwrap_or(&self.0))
    }
}

// ── NodeId ───────────────────────────────────────────────────────────────────

/// Identifies a storage/validator node participating in Proof-of-Archive.
/// Distinct from `Address` — a node need not hold a token balance.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Debug)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An archive's content address: hex-encoded SHA-256 of the raw content.
pub type ArchiveId = String;
