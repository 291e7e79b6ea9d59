//! Content verification contract: reputation-weighted consensus on archive
//! integrity. Grounded on the original `ContentVerification`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use archivechain_core::constants::{
    VERIFICATION_CONSENSUS_THRESHOLD, VERIFICATION_THRESHOLD_VOTES, VERIFIER_REPUTATION_DEFAULT,
    VERIFIER_REPUTATION_MAX, VERIFIER_REPUTATION_MIN, VERIFIER_REPUTATION_STEP,
};
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{Address, Timestamp};

use crate::event::ContractEvent;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub verifier: Address,
    pub checksum: String,
    pub is_valid: bool,
    pub timestamp: Timestamp,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub votes: Vec<Vote>,
    pub consensus: Option<bool>,
    pub final_checksum: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentVerification {
    pub id: String,
    pub creator: Address,
    pub created_at: Timestamp,
    pub records: HashMap<String, VerificationRecord>,
    pub verifiers: HashMap<Address, f64>,
    pub events: Vec<ContractEvent>,
}

impl ContentVerification {
    pub fn new(id: String, creator: Address, now: Timestamp) -> Self {
        Self {
            id,
            creator,
            created_at: now,
            records: HashMap::new(),
            verifiers: HashMap::new(),
            events: Vec::new(),
        }
    }

    fn emit(&mut self, event_type: &str, data: serde_json::Value, now: Timestamp) {
        self.events.push(ContractEvent::new(&self.id, event_type, data, now));
    }

    pub fn submit_verification(
        &mut self,
        verifier: Address,
        archive_id: &str,
        checksum: String,
        is_valid: bool,
        now: Timestamp,
    ) -> Result<bool, ArchiveChainError> {
        let record = self.records.entry(archive_id.to_string()).or_default();
        record.votes.push(Vote {
            verifier: verifier.clone(),
            checksum,
            is_valid,
            timestamp: now,
        });
        self.verifiers.entry(verifier.clone()).or_insert(VERIFIER_REPUTATION_DEFAULT);

        self.emit(
            "VerificationSubmitted",
            json!({ "verifier": verifier.as_str(), "archive_id": archive_id, "is_valid": is_valid }),
            now,
        );

        if self.records[archive_id].votes.len() as u32 >= VERIFICATION_THRESHOLD_VOTES {
            self.determine_consensus(archive_id, now);
        }
        Ok(true)
    }

    fn determine_consensus(&mut self, archive_id: &str, now: Timestamp) {
        let votes = self.records[archive_id].votes.clone();

        let mut total_weight = 0.0;
        let mut weighted_valid = 0.0;
        for vote in &votes {
            let reputation = *self
                .verifiers
                .get(&vote.verifier)
                .unwrap_or(&VERIFIER_REPUTATION_DEFAULT);
            total_weight += reputation;
            if vote.is_valid {
                weighted_valid += reputation;
            }
        }
        let validity_ratio = if total_weight > 0.0 { weighted_valid / total_weight } else { 0.0 };
        let is_consensus_valid = validity_ratio > VERIFICATION_CONSENSUS_THRESHOLD;

        let mut checksum_counts: HashMap<&str, usize> = HashMap::new();
        for vote in votes.iter().filter(|v| v.is_valid) {
            *checksum_counts.entry(vote.checksum.as_str()).or_insert(0) += 1;
        }
        let final_checksum = checksum_counts
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(checksum, _)| checksum.to_string());

        {
            let record = self.records.get_mut(archive_id).expect("just inserted above");
            record.consensus = Some(is_consensus_valid);
            record.final_checksum = final_checksum.clone();
        }

        for vote in &votes {
            let reputation = self.verifiers.entry(vote.verifier.clone()).or_insert(VERIFIER_REPUTATION_DEFAULT);
            if vote.is_valid == is_consensus_valid {
                *reputation = (*reputation + VERIFIER_REPUTATION_STEP).min(VERIFIER_REPUTATION_MAX);
            } else {
                *reputation = (*reputation - VERIFIER_REPUTATION_STEP).max(VERIFIER_REPUTATION_MIN);
            }
        }

        self.emit(
            "ConsensusReached",
            json!({ "archive_id": archive_id, "is_valid": is_consensus_valid, "final_checksum": final_checksum, "validity_ratio": validity_ratio }),
            now,
        );
    }

    pub fn get_verification_status(&self, archive_id: &str) -> Option<&VerificationRecord> {
        self.records.get(archive_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consensus_valid_raises_reputation_of_agreeing_verifiers() {
        let mut cv = ContentVerification::new("cv-1".into(), Address::new("arc_creator"), 0);
        cv.submit_verification(Address::new("v1"), "a1", "sum1".into(), true, 0).unwrap();
        cv.submit_verification(Address::new("v2"), "a1", "sum1".into(), true, 0).unwrap();
        cv.submit_verification(Address::new("v3"), "a1", "sum1".into(), true, 0).unwrap();

        let record = cv.get_verification_status("a1").unwrap();
        assert_eq!(record.consensus, Some(true));
        assert_eq!(record.final_checksum, Some("sum1".to_string()));
        assert_eq!(cv.verifiers[&Address::new("v1")], VERIFIER_REPUTATION_DEFAULT + VERIFIER_REPUTATION_STEP);
    }

    #[test]
    fn dissenting_verifier_loses_reputation() {
        let mut cv = ContentVerification::new("cv-1".into(), Address::new("arc_creator"), 0);
        cv.submit_verification(Address::new("v1"), "a1", "sum1".into(), true, 0).unwrap();
        cv.submit_verification(Address::new("v2"), "a1", "sum1".into(), true, 0).unwrap();
        cv.submit_verification(Address::new("v3"), "a1", "sum-bad".into(), false, 0).unwrap();

        assert_eq!(cv.verifiers[&Address::new("v3")], VERIFIER_REPUTATION_DEFAULT - VERIFIER_REPUTATION_STEP);
    }

    #[test]
    fn below_threshold_votes_have_no_consensus_yet() {
        let mut cv = ContentVerification::new("cv-1".into(), Address::new("arc_creator"), 0);
        cv.submit_verification(Address::new("v1"), "a1", "sum1".into(), true, 0).unwrap();
        assert!(cv.get_verification_status("a1").unwrap().consensus.is_none());
    }
}
