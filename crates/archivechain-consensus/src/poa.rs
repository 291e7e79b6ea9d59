//! Proof-of-Archive orchestrator: proof stores, verification, scoring,
//! election, and garbage collection, tying the rest of the crate together
//! the way the original's `ProofOfArchive` class does.

use std::collections::HashMap;

use archivechain_core::constants::{
    LONGEVITY_PROOF_GC_MAX_AGE_SECS, MAX_RESPONSE_TIME_MS, MIN_BANDWIDTH_SERVED_BYTES,
    MIN_STORAGE_DURATION_SECS, MIN_STORAGE_SIZE_BYTES, PROOF_GC_MAX_AGE_SECS,
};
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{NodeId, Timestamp};

use crate::challenges::ChallengeTable;
use crate::proofs::{expected_storage_response, BandwidthProof, LongevityProof, StorageProof};
use crate::scoring::{bandwidth_score, longevity_score, storage_score, total_score};
use crate::validator::{select_block_validator, top_candidates, validate_block_creation_right};

#[derive(Default)]
pub struct ProofStore {
    storage: HashMap<NodeId, Vec<StorageProof>>,
    bandwidth: HashMap<NodeId, Vec<BandwidthProof>>,
    longevity: HashMap<NodeId, Vec<LongevityProof>>,
}

/// Central Proof-of-Archive state: issued challenges plus every accepted
/// proof, keyed by node.
#[derive(Default)]
pub struct ProofOfArchive {
    pub challenges: ChallengeTable,
    store: ProofStore,
}

impl ProofOfArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate_storage_challenge(
        &mut self,
        node_id: NodeId,
        archive_id: String,
        now: Timestamp,
    ) -> String {
        self.challenges.issue(node_id, archive_id, now)
    }

    /// Verify a storage proof against its issued challenge and the file-size
    /// floor, then record it.
    pub fn verify_storage_proof(
        &mut self,
        proof: StorageProof,
        now: Timestamp,
    ) -> Result<bool, ArchiveChainError> {
        let issued = self
            .challenges
            .consume(&proof.node_id, &proof.archive_id, proof.timestamp);
        let Some(issued_challenge) = issued else {
            return Ok(false);
        };
        if issued_challenge != proof.challenge {
            return Ok(false);
        }
        if proof.file_size < MIN_STORAGE_SIZE_BYTES {
            return Ok(false);
        }
        if now - proof.timestamp > archivechain_core::constants::PROOF_VALIDITY_PERIOD_SECS {
            return Ok(false);
        }
        let expected = expected_storage_response(&proof.checksum, &proof.challenge);
        if expected != proof.response {
            return Ok(false);
        }

        self.store
            .storage
            .entry(proof.node_id.clone())
            .or_default()
            .push(proof);
        Ok(true)
    }

    pub fn verify_bandwidth_proof(&mut self, proof: BandwidthProof) -> Result<bool, ArchiveChainError> {
        if proof.bytes_served < MIN_BANDWIDTH_SERVED_BYTES {
            return Ok(false);
        }
        if proof.response_time_avg_ms > MAX_RESPONSE_TIME_MS as f64 {
            return Ok(false);
        }
        if proof.period_end <= proof.period_start {
            return Ok(false);
        }
        // client_signatures are counted, not cryptographically verified at
        // this layer (spec.md Open Question); the floor is max(1, requests/100).
        let min_signatures = (proof.request_count / 100).max(1) as usize;
        if proof.client_signatures.len() < min_signatures {
            return Ok(false);
        }
        self.store
            .bandwidth
            .entry(proof.node_id.clone())
            .or_default()
            .push(proof);
        Ok(true)
    }

    pub fn verify_longevity_proof(&mut self, proof: LongevityProof) -> Result<bool, ArchiveChainError> {
        if proof.storage_duration_secs < MIN_STORAGE_DURATION_SECS {
            return Ok(false);
        }
        if !(0.0..=1.0).contains(&proof.availability_score) {
            return Ok(false);
        }
        self.store
            .longevity
            .entry(proof.node_id.clone())
            .or_default()
            .push(proof);
        Ok(true)
    }

    /// Compute a node's current total PoA score from its accepted proofs.
    /// `window_hours` is the observation window used for both storage-proof
    /// frequency and bandwidth aggregation (see `scoring::storage_score` /
    /// `scoring::bandwidth_score`); `now` anchors that window.
    pub fn score_node(&self, node_id: &NodeId, window_hours: f64, now: Timestamp) -> f64 {
        let storage = self
            .store
            .storage
            .get(node_id)
            .map(|proofs| storage_score(proofs, window_hours, now))
            .unwrap_or(0.0);
        let bandwidth = self
            .store
            .bandwidth
            .get(node_id)
            .map(|proofs| bandwidth_score(proofs, window_hours, now))
            .unwrap_or(0.0);
        let longevity = self
            .store
            .longevity
            .get(node_id)
            .map(|proofs| longevity_score(proofs))
            .unwrap_or(0.0);
        total_score(storage, bandwidth, longevity)
    }

    pub fn scores_for_all_nodes(&self, window_hours: f64, now: Timestamp) -> HashMap<NodeId, f64> {
        let mut nodes: std::collections::HashSet<NodeId> = std::collections::HashSet::new();
        nodes.extend(self.store.storage.keys().cloned());
        nodes.extend(self.store.bandwidth.keys().cloned());
        nodes.extend(self.store.longevity.keys().cloned());
        nodes
            .into_iter()
            .map(|id| {
                let score = self.score_node(&id, window_hours, now);
                (id, score)
            })
            .collect()
    }

    /// Elect a validator for the next block: rank all scored nodes, keep the
    /// top candidate set, then draw score-weighted.
    pub fn elect_validator(&self, window_hours: f64, now: Timestamp) -> Option<NodeId> {
        let scores = self.scores_for_all_nodes(window_hours, now);
        let candidates = top_candidates(&scores);
        select_block_validator(&candidates)
    }

    pub fn validate_block_creation_right(
        &self,
        node_id: &NodeId,
        window_hours: f64,
        now: Timestamp,
    ) -> Result<(), ArchiveChainError> {
        validate_block_creation_right(self.score_node(node_id, window_hours, now))
    }

    /// Drop proofs older than their GC window: 7 days for storage/bandwidth,
    /// 30 days for longevity (spec §4.6 resolution of the original's
    /// `max_age * 4` quirk into a flat 30-day window).
    pub fn cleanup_expired_proofs(&mut self, now: Timestamp) {
        for proofs in self.store.storage.values_mut() {
            proofs.retain(|p| now - p.timestamp <= PROOF_GC_MAX_AGE_SECS);
        }
        for proofs in self.store.bandwidth.values_mut() {
            proofs.retain(|p| now - p.timestamp <= PROOF_GC_MAX_AGE_SECS);
        }
        for proofs in self.store.longevity.values_mut() {
            proofs.retain(|p| now - p.storage_start <= LONGEVITY_PROOF_GC_MAX_AGE_SECS);
        }
        self.challenges.prune_expired(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_storage_proof(node: &NodeId, challenge: String, timestamp: Timestamp) -> StorageProof {
        let checksum = "abc123".to_string();
        StorageProof {
            node_id: node.clone(),
            archive_id: "archive-1".into(),
            challenge: challenge.clone(),
            response: expected_storage_response(&checksum, &challenge),
            timestamp,
            file_size: MIN_STORAGE_SIZE_BYTES,
            checksum,
        }
    }

    #[test]
    fn storage_proof_round_trip_succeeds() {
        let mut poa = ProofOfArchive::new();
        let node = NodeId::new("n1");
        let challenge = poa.generate_storage_challenge(node.clone(), "archive-1".into(), 1000);
        let proof = sample_storage_proof(&node, challenge, 1000);
        assert!(poa.verify_storage_proof(proof, 1000).unwrap());
    }

    #[test]
    fn storage_proof_rejected_without_challenge() {
        let mut poa = ProofOfArchive::new();
        let node = NodeId::new("n1");
        let proof = sample_storage_proof(&node, "bogus-challenge".into(), 1000);
        assert!(!poa.verify_storage_proof(proof, 1000).unwrap());
    }

    #[test]
    fn storage_proof_rejected_under_size_floor() {
        let mut poa = ProofOfArchive::new();
        let node = NodeId::new("n1");
        let challenge = poa.generate_storage_challenge(node.clone(), "archive-1".into(), 1000);
        let mut proof = sample_storage_proof(&node, challenge, 1000);
        proof.file_size = 1024;
        assert!(!poa.verify_storage_proof(proof, 1000).unwrap());
    }

    #[test]
    fn bandwidth_proof_rejected_below_minimum_bytes() {
        let mut poa = ProofOfArchive::new();
        let proof = BandwidthProof {
            node_id: NodeId::new("n1"),
            bytes_served: 1024,
            request_count: 10,
            response_time_avg_ms: 100.0,
            timestamp: 0,
            period_start: 0,
            period_end: 3600,
            client_signatures: vec![],
        };
        assert!(!poa.verify_bandwidth_proof(proof).unwrap());
    }

    #[test]
    fn bandwidth_proof_rejected_with_too_few_client_signatures() {
        let mut poa = ProofOfArchive::new();
        let proof = BandwidthProof {
            node_id: NodeId::new("n1"),
            bytes_served: 200 * 1024 * 1024,
            request_count: 500,
            response_time_avg_ms: 100.0,
            timestamp: 0,
            period_start: 0,
            period_end: 3600,
            client_signatures: vec!["sig1".into()],
        };
        // request_count/100 = 5 required signatures, only 1 supplied.
        assert!(!poa.verify_bandwidth_proof(proof).unwrap());
    }

    #[test]
    fn bandwidth_proof_accepted_with_enough_signatures() {
        let mut poa = ProofOfArchive::new();
        let proof = BandwidthProof {
            node_id: NodeId::new("n1"),
            bytes_served: 200 * 1024 * 1024,
            request_count: 50,
            response_time_avg_ms: 100.0,
            timestamp: 0,
            period_start: 0,
            period_end: 3600,
            client_signatures: vec!["sig1".into()],
        };
        // request_count/100 = 0 -> floor is max(1, 0) = 1.
        assert!(poa.verify_bandwidth_proof(proof).unwrap());
    }

    #[test]
    fn cleanup_drops_stale_storage_proofs() {
        let mut poa = ProofOfArchive::new();
        let node = NodeId::new("n1");
        let challenge = poa.generate_storage_challenge(node.clone(), "archive-1".into(), 0);
        let proof = sample_storage_proof(&node, challenge, 0);
        poa.verify_storage_proof(proof, 0).unwrap();
        poa.cleanup_expired_proofs(PROOF_GC_MAX_AGE_SECS + 1);
        assert_eq!(poa.score_node(&node, 24.0, PROOF_GC_MAX_AGE_SECS + 1), 0.0);
    }
}
