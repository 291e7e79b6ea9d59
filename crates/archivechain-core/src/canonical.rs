//! Canonical JSON serialization used for transaction/block hashing and signing.
//!
//! `serde_json`'s `Map` is backed by a `BTreeMap` (the `preserve_order`
//! feature is not enabled anywhere in this workspace), so serializing through
//! `serde_json::Value` already yields sorted object keys. Combined with
//! `serde_json::to_string` (no pretty-printing), this gives the stable,
//! whitespace-free form the protocol signs and hashes over.

use serde::Serialize;

use crate::error::ArchiveChainError;

/// Serialize `value` to its canonical JSON bytes: sorted keys, no whitespace.
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, ArchiveChainError> {
    let as_value = serde_json::to_value(value)
        .map_err(|e| ArchiveChainError::Persistence(format!("canonicalization failed: {e}")))?;
    serde_json::to_vec(&as_value)
        .map_err(|e| ArchiveChainError::Persistence(format!("canonicalization failed: {e}")))
}
