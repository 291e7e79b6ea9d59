//! The three per-dimension PoA scores and their weighted combination.
//!
//! Formulas are grounded on the original `ProofOfArchive.calculate_storage_score`
//! / `calculate_bandwidth_score` / `calculate_longevity_score` /
//! `calculate_total_score` (`original_source/src/blockchain/consensus.py`),
//! carried over unchanged (spec §4.6).

use crate::proofs::{BandwidthProof, LongevityProof, StorageProof};
use archivechain_core::constants::{BANDWIDTH_WEIGHT, LONGEVITY_WEIGHT, STORAGE_WEIGHT};
use archivechain_core::types::Timestamp;

const STORAGE_REFERENCE_BYTES: f64 = 100.0 * 1024.0 * 1024.0 * 1024.0; // 100 GiB
const STORAGE_REFERENCE_PROOFS_PER_HOUR: f64 = 24.0;
const BANDWIDTH_REFERENCE_BYTES: f64 = 10.0 * 1024.0 * 1024.0 * 1024.0; // 10 GiB
const BANDWIDTH_REFERENCE_REQUESTS: f64 = 10_000.0;
const BANDWIDTH_REFERENCE_RESPONSE_MS: f64 = 5_000.0;
const LONGEVITY_REFERENCE_SECS: f64 = 365.0 * 24.0 * 3600.0; // 1 year

/// `0.7 * min(1, sqrt(total_bytes / 100GiB)) + 0.3 * min(1, proofs_per_hour / 24)`,
/// considering only proofs within `window_hours` of `now` (matches the
/// original's `recent_proofs` filter — proofs aged out of the window don't
/// count, they just haven't been garbage-collected yet).
pub fn storage_score(proofs: &[StorageProof], window_hours: f64, now: Timestamp) -> f64 {
    if window_hours <= 0.0 {
        return 0.0;
    }
    let window_secs = (window_hours * 3600.0) as i64;
    let recent: Vec<&StorageProof> = proofs.iter().filter(|p| now - p.timestamp <= window_secs).collect();
    if recent.is_empty() {
        return 0.0;
    }
    let total_bytes: u64 = recent.iter().map(|p| p.file_size).sum();
    let size_component = (total_bytes as f64 / STORAGE_REFERENCE_BYTES).sqrt().min(1.0);
    let proofs_per_hour = recent.len() as f64 / window_hours;
    let frequency_component = (proofs_per_hour / STORAGE_REFERENCE_PROOFS_PER_HOUR).min(1.0);
    0.7 * size_component + 0.3 * frequency_component
}

/// `0.4 * min(1, bytes/10GiB) + 0.3 * min(1, requests/10000) + 0.3 * max(0, 1 - avg_ms/5000)`,
/// aggregated (summed bytes/requests, averaged latency) across every proof
/// within `window_hours` of `now`, matching the original's `recent_proofs`
/// aggregation rather than looking at only the single latest proof.
pub fn bandwidth_score(proofs: &[BandwidthProof], window_hours: f64, now: Timestamp) -> f64 {
    if window_hours <= 0.0 {
        return 0.0;
    }
    let window_secs = (window_hours * 3600.0) as i64;
    let recent: Vec<&BandwidthProof> = proofs.iter().filter(|p| now - p.timestamp <= window_secs).collect();
    if recent.is_empty() {
        return 0.0;
    }
    let total_bytes: u64 = recent.iter().map(|p| p.bytes_served).sum();
    let total_requests: u64 = recent.iter().map(|p| p.request_count).sum();
    let avg_response_ms: f64 =
        recent.iter().map(|p| p.response_time_avg_ms).sum::<f64>() / recent.len() as f64;

    let bytes_component = (total_bytes as f64 / BANDWIDTH_REFERENCE_BYTES).min(1.0);
    let requests_component = (total_requests as f64 / BANDWIDTH_REFERENCE_REQUESTS).min(1.0);
    let latency_component = (1.0 - avg_response_ms / BANDWIDTH_REFERENCE_RESPONSE_MS).max(0.0);
    0.4 * bytes_component + 0.3 * requests_component + 0.3 * latency_component
}

/// Duration-weighted average of `0.6 * min(1, duration/1yr) + 0.4 * availability`
/// across all longevity proofs for a node.
pub fn longevity_score(proofs: &[LongevityProof]) -> f64 {
    let total_duration: i64 = proofs.iter().map(|p| p.storage_duration_secs).sum();
    if total_duration <= 0 {
        return 0.0;
    }
    let weighted: f64 = proofs
        .iter()
        .map(|p| {
            let duration_component =
                (p.storage_duration_secs as f64 / LONGEVITY_REFERENCE_SECS).min(1.0);
            let per_proof = 0.6 * duration_component + 0.4 * p.availability_score;
            per_proof * p.storage_duration_secs as f64
        })
        .sum();
    weighted / total_duration as f64
}

/// `0.5 * storage + 0.3 * bandwidth + 0.2 * longevity`
pub fn total_score(storage: f64, bandwidth: f64, longevity: f64) -> f64 {
    STORAGE_WEIGHT * storage + BANDWIDTH_WEIGHT * bandwidth + LONGEVITY_WEIGHT * longevity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_proof(file_size: u64) -> StorageProof {
        StorageProof {
            node_id: archivechain_core::types::NodeId::new("n1"),
            archive_id: "a1".into(),
            challenge: "c".into(),
            response: "r".into(),
            timestamp: 0,
            file_size,
            checksum: "chk".into(),
        }
    }

    #[test]
    fn storage_score_is_zero_with_no_proofs() {
        assert_eq!(storage_score(&[], 24.0, 0), 0.0);
    }

    #[test]
    fn storage_score_saturates_at_one_per_component() {
        let proofs: Vec<_> = (0..48).map(|_| storage_proof(200 * 1024 * 1024 * 1024)).collect();
        let score = storage_score(&proofs, 1.0, 0);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn storage_score_ignores_proofs_outside_the_window() {
        let mut stale = storage_proof(200 * 1024 * 1024 * 1024);
        stale.timestamp = 0;
        let now = 48 * 3600;
        // 48h old, but the window is only 24h: must not count.
        assert_eq!(storage_score(&[stale], 24.0, now), 0.0);
    }

    #[test]
    fn bandwidth_score_penalizes_high_latency() {
        let fast = BandwidthProof {
            node_id: archivechain_core::types::NodeId::new("n1"),
            bytes_served: 10 * 1024 * 1024 * 1024,
            request_count: 10_000,
            response_time_avg_ms: 0.0,
            timestamp: 0,
            period_start: 0,
            period_end: 3600,
            client_signatures: vec![],
        };
        let mut slow = fast.clone();
        slow.response_time_avg_ms = 5_000.0;
        assert!(bandwidth_score(&[fast.clone()], 24.0, 0) > bandwidth_score(&[slow], 24.0, 0));
        assert!((bandwidth_score(&[fast], 24.0, 0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bandwidth_score_aggregates_all_proofs_in_window() {
        let half = BandwidthProof {
            node_id: archivechain_core::types::NodeId::new("n1"),
            bytes_served: 5 * 1024 * 1024 * 1024,
            request_count: 5_000,
            response_time_avg_ms: 0.0,
            timestamp: 0,
            period_start: 0,
            period_end: 3600,
            client_signatures: vec![],
        };
        let mut other = half.clone();
        other.timestamp = 3600;
        // Two proofs, each half of the reference values, summed over the
        // window should saturate the bytes/requests components at 1.0 -
        // using only the latest proof would instead score 0.5.
        let score = bandwidth_score(&[half, other], 24.0, 7200);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn longevity_score_weights_by_duration() {
        let short = LongevityProof {
            node_id: archivechain_core::types::NodeId::new("n1"),
            archive_id: "a1".into(),
            storage_start: 0,
            storage_duration_secs: 1,
            consistency_checks: vec![],
            availability_score: 0.0,
        };
        let long = LongevityProof {
            storage_duration_secs: 365 * 24 * 3600,
            availability_score: 1.0,
            ..short.clone()
        };
        let score = longevity_score(&[short, long]);
        assert!(score > 0.9);
    }

    #[test]
    fn total_score_combines_with_spec_weights() {
        let score = total_score(1.0, 1.0, 1.0);
        assert!((score - 1.0).abs() < 1e-9);
        let score = total_score(1.0, 0.0, 0.0);
        assert!((score - 0.5).abs() < 1e-9);
    }
}
