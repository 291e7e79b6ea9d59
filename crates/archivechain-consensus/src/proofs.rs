use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use archivechain_core::types::{NodeId, Timestamp};

/// Proof that a node stores a specific archive.
///
/// `response` is a raw, unsalted `SHA-256(expected_checksum ‖ challenge)` —
/// deliberately distinct from the PBKDF2-salted integrity checksum used
/// elsewhere (see DESIGN.md for the Open Question this resolves).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageProof {
    pub node_id: NodeId,
    pub archive_id: String,
    pub challenge: String,
    pub response: String,
    pub timestamp: Timestamp,
    pub file_size: u64,
    pub checksum: String,
}

/// Compute the expected storage-proof response for a given checksum/challenge pair.
pub fn expected_storage_response(expected_checksum: &str, challenge: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(expected_checksum.as_bytes());
    hasher.update(challenge.as_bytes());
    hex::encode(hasher.finalize())
}

/// Proof of bandwidth and serving capability over a measured period.
///
/// `client_signatures` are opaque counted blobs at this layer — not
/// cryptographically verified here (spec §4.6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BandwidthProof {
    pub node_id: NodeId,
    pub bytes_served: u64,
    pub request_count: u64,
    pub response_time_avg_ms: f64,
    pub timestamp: Timestamp,
    pub period_start: Timestamp,
    pub period_end: Timestamp,
    pub client_signatures: Vec<String>,
}

/// Proof of long-term storage commitment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LongevityProof {
    pub node_id: NodeId,
    pub archive_id: String,
    pub storage_start: Timestamp,
    pub storage_duration_secs: i64,
    pub consistency_checks: Vec<Timestamp>,
    pub availability_score: f64,
}
