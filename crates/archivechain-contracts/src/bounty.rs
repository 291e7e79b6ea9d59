//! Archive bounty contract: pay the first archiver who preserves a target
//! URL and passes validator review. Grounded on the original `ArchiveBounty`.
//!
//! Token movement (escrow at creation, release/refund on completion) is the
//! chain layer's (C8) responsibility: this contract only tracks state and
//! emits events naming the amount and recipient so the caller can act on
//! them. Keeping ledger mutation out of the contract layer avoids a
//! dependency cycle back onto `archivechain-token` and matches spec §4.7's
//! framing of contracts as "typed state machines, not bytecode."

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use archivechain_core::constants::BOUNTY_REQUIRED_VOTES;
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{Address, Timestamp};
use archivechain_safemath::Amount;

use crate::event::ContractEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BountyStatus {
    Open,
    InProgress,
    Completed,
    Expired,
    Cancelled,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveBounty {
    pub id: String,
    pub creator: Address,
    pub created_at: Timestamp,
    pub target_url: String,
    pub reward: Amount,
    pub deadline: Timestamp,
    pub status: BountyStatus,
    pub claimant: Option<Address>,
    pub archive_hash: Option<String>,
    pub submission_time: Option<Timestamp>,
    pub verification_votes: HashMap<Address, bool>,
    pub events: Vec<ContractEvent>,
}

impl ArchiveBounty {
    pub fn new(
        id: String,
        creator: Address,
        target_url: String,
        reward: Amount,
        deadline: Timestamp,
        now: Timestamp,
    ) -> Self {
        let mut bounty = Self {
            id,
            creator,
            created_at: now,
            target_url,
            reward,
            deadline,
            status: BountyStatus::Open,
            claimant: None,
            archive_hash: None,
            submission_time: None,
            verification_votes: HashMap::new(),
            events: Vec::new(),
        };
        bounty.emit(
            "BountyCreated",
            json!({ "target_url": bounty.target_url, "reward": bounty.reward.to_string() }),
            now,
        );
        bounty
    }

    fn emit(&mut self, event_type: &str, data: serde_json::Value, now: Timestamp) {
        self.events.push(ContractEvent::new(&self.id, event_type, data, now));
    }

    /// Transition `Open -> Expired` if the deadline has passed. Must be
    /// checked at the top of every interaction, per spec §4.7.
    fn check_expiry(&mut self, now: Timestamp) {
        if self.status == BountyStatus::Open && now > self.deadline {
            self.status = BountyStatus::Expired;
            self.emit("BountyExpired", json!({}), now);
        }
    }

    pub fn claim_bounty(
        &mut self,
        claimant: Address,
        archive_hash: String,
        now: Timestamp,
    ) -> Result<bool, ArchiveChainError> {
        self.check_expiry(now);
        if self.status != BountyStatus::Open {
            return Ok(false);
        }
        self.claimant = Some(claimant.clone());
        self.archive_hash = Some(archive_hash.clone());
        self.submission_time = Some(now);
        self.status = BountyStatus::InProgress;
        self.emit(
            "BountyClaimed",
            json!({ "claimant": claimant.as_str(), "archive_hash": archive_hash }),
            now,
        );
        Ok(true)
    }

    /// Record a validator vote; after `BOUNTY_REQUIRED_VOTES`, majority-true
    /// completes the bounty and majority-false reopens it. Returns the
    /// reward-payout instruction when this vote triggers completion.
    pub fn verify_submission(
        &mut self,
        validator: Address,
        is_valid: bool,
        now: Timestamp,
    ) -> Result<Option<(Address, Amount)>, ArchiveChainError> {
        if self.status != BountyStatus::InProgress {
            return Ok(None);
        }
        self.verification_votes.insert(validator.clone(), is_valid);
        self.emit(
            "VerificationVote",
            json!({ "validator": validator.as_str(), "vote": is_valid, "total_votes": self.verification_votes.len() }),
            now,
        );

        if self.verification_votes.len() as u32 >= BOUNTY_REQUIRED_VOTES {
            let valid_votes = self.verification_votes.values().filter(|v| **v).count();
            let total_votes = self.verification_votes.len();
            if valid_votes * 2 > total_votes {
                let claimant = self.claimant.clone().expect("InProgress implies claimant set");
                self.status = BountyStatus::Completed;
                self.emit(
                    "BountyCompleted",
                    json!({ "claimant": claimant.as_str(), "reward": self.reward.to_string() }),
                    now,
                );
                return Ok(Some((claimant, self.reward)));
            } else {
                self.claimant = None;
                self.archive_hash = None;
                self.submission_time = None;
                self.verification_votes.clear();
                self.status = BountyStatus::Open;
                self.emit("SubmissionRejected", json!({}), now);
            }
        }
        Ok(None)
    }

    /// Creator-only cancellation from `Open`/`InProgress`. Returns the
    /// escrow-refund instruction (to the creator) on success.
    pub fn cancel_bounty(
        &mut self,
        caller: &Address,
        now: Timestamp,
    ) -> Result<Option<Amount>, ArchiveChainError> {
        if caller != &self.creator {
            return Ok(None);
        }
        if matches!(self.status, BountyStatus::Completed | BountyStatus::Expired | BountyStatus::Cancelled) {
            return Ok(None);
        }
        self.status = BountyStatus::Cancelled;
        self.emit("BountyCancelled", json!({ "cancelled_by": caller.as_str() }), now);
        Ok(Some(self.reward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounty() -> ArchiveBounty {
        ArchiveBounty::new(
            "bounty-1".into(),
            Address::new("arc_creator"),
            "https://example.com".into(),
            Amount::from_arc(500),
            100_000,
            0,
        )
    }

    #[test]
    fn happy_path_completes_with_majority_true() {
        let mut b = bounty();
        let claimant = Address::new("arc_claimant");
        assert!(b.claim_bounty(claimant.clone(), "deadbeef".into(), 10).unwrap());
        assert_eq!(b.status, BountyStatus::InProgress);

        assert!(b.verify_submission(Address::new("v1"), true, 20).unwrap().is_none());
        assert!(b.verify_submission(Address::new("v2"), true, 20).unwrap().is_none());
        let payout = b.verify_submission(Address::new("v3"), true, 20).unwrap();
        assert_eq!(payout, Some((claimant, Amount::from_arc(500))));
        assert_eq!(b.status, BountyStatus::Completed);
    }

    #[test]
    fn majority_false_reopens_bounty() {
        let mut b = bounty();
        let claimant = Address::new("arc_claimant");
        b.claim_bounty(claimant, "deadbeef".into(), 10).unwrap();
        b.verify_submission(Address::new("v1"), false, 20).unwrap();
        b.verify_submission(Address::new("v2"), false, 20).unwrap();
        let payout = b.verify_submission(Address::new("v3"), true, 20).unwrap();
        assert!(payout.is_none());
        assert_eq!(b.status, BountyStatus::Open);
        assert!(b.claimant.is_none());
        assert!(b.verification_votes.is_empty());
    }

    #[test]
    fn non_creator_cannot_cancel() {
        let mut b = bounty();
        let refund = b.cancel_bounty(&Address::new("arc_stranger"), 5).unwrap();
        assert!(refund.is_none());
        assert_eq!(b.status, BountyStatus::Open);
    }

    #[test]
    fn expires_past_deadline() {
        let mut b = bounty();
        let claimed = b.claim_bounty(Address::new("arc_claimant"), "h".into(), 200_000).unwrap();
        assert!(!claimed);
        assert_eq!(b.status, BountyStatus::Expired);
    }
}
