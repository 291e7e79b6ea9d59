//! Top-candidate selection and score-weighted validator election.
//!
//! Grounded on the original `ProofOfArchive.get_top_validators` /
//! `select_block_validator`: rank all eligible nodes by total score, keep the
//! top `VALIDATOR_CANDIDATE_SET_SIZE`, then draw one validator with
//! probability proportional to score. Spec §4.1 forbids a non-cryptographic
//! PRNG anywhere in consensus, so the draw uses `OsRng`, not `rand::thread_rng`.

use std::collections::HashMap;

use archivechain_core::constants::{MIN_ELIGIBLE_SCORE, VALIDATOR_CANDIDATE_SET_SIZE};
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::NodeId;
use rand::rngs::OsRng;
use rand::RngCore;

/// Rank nodes by total score descending and keep the top
/// `VALIDATOR_CANDIDATE_SET_SIZE` whose score meets `MIN_ELIGIBLE_SCORE`.
pub fn top_candidates(scores: &HashMap<NodeId, f64>) -> Vec<(NodeId, f64)> {
    let mut eligible: Vec<(NodeId, f64)> = scores
        .iter()
        .filter(|(_, &score)| score >= MIN_ELIGIBLE_SCORE)
        .map(|(id, &score)| (id.clone(), score))
        .collect();
    eligible.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    eligible.truncate(VALIDATOR_CANDIDATE_SET_SIZE);
    eligible
}

/// Draw a validator from the candidate set with probability proportional to
/// score, using a CSPRNG. Returns `None` if the candidate set is empty.
pub fn select_block_validator(candidates: &[(NodeId, f64)]) -> Option<NodeId> {
    let total: f64 = candidates.iter().map(|(_, score)| score).sum();
    if candidates.is_empty() || total <= 0.0 {
        return None;
    }
    let mut buf = [0u8; 8];
    OsRng.fill_bytes(&mut buf);
    let roll = (u64::from_le_bytes(buf) as f64 / u64::MAX as f64) * total;

    let mut cumulative = 0.0;
    for (node_id, score) in candidates {
        cumulative += score;
        if roll < cumulative {
            return Some(node_id.clone());
        }
    }
    candidates.last().map(|(id, _)| id.clone())
}

/// A node may create a block only if its score clears `MIN_ELIGIBLE_SCORE`.
pub fn validate_block_creation_right(score: f64) -> Result<(), ArchiveChainError> {
    if score < MIN_ELIGIBLE_SCORE {
        return Err(ArchiveChainError::UnauthorizedValidator);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_candidates_filters_and_truncates() {
        let mut scores = HashMap::new();
        for i in 0..25 {
            scores.insert(NodeId::new(format!("n{i}")), 0.2 + i as f64 * 0.01);
        }
        scores.insert(NodeId::new("too_low"), 0.01);
        let candidates = top_candidates(&scores);
        assert_eq!(candidates.len(), 20);
        assert!(candidates.iter().all(|(_, s)| *s >= MIN_ELIGIBLE_SCORE));
        assert!(candidates.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn select_block_validator_picks_among_candidates() {
        let candidates = vec![
            (NodeId::new("a"), 0.5),
            (NodeId::new("b"), 0.3),
            (NodeId::new("c"), 0.2),
        ];
        let picked = select_block_validator(&candidates).unwrap();
        assert!(candidates.iter().any(|(id, _)| id == &picked));
    }

    #[test]
    fn select_block_validator_none_when_empty() {
        assert!(select_block_validator(&[]).is_none());
    }

    #[test]
    fn validate_block_creation_right_rejects_low_score() {
        assert!(validate_block_creation_right(0.05).is_err());
        assert!(validate_block_creation_right(0.5).is_ok());
    }
}
