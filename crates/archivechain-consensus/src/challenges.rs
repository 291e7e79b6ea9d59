use std::collections::HashMap;

use archivechain_core::constants::CHALLENGE_VALIDITY_SECS;
use archivechain_core::types::{NodeId, Timestamp};
use archivechain_crypto::generate_challenge;

struct ActiveChallenge {
    challenge: String,
    issued_at: Timestamp,
}

/// Live `(node, archive) -> challenge` table for storage-proof issuance,
/// keyed exactly like the original's `f"{node_id}_{archive_id}"` table.
#[derive(Default)]
pub struct ChallengeTable {
    active: HashMap<(NodeId, String), ActiveChallenge>,
}

impl ChallengeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, node_id: NodeId, archive_id: String, now: Timestamp) -> String {
        let challenge = generate_challenge(&node_id, &archive_id, now);
        self.active.insert(
            (node_id, archive_id),
            ActiveChallenge {
                challenge: challenge.clone(),
                issued_at: now,
            },
        );
        challenge
    }

    /// Consume and return the live challenge for `(node_id, archive_id)` if one
    /// exists and hasn't expired; expired entries are evicted either way.
    pub fn consume(&mut self, node_id: &NodeId, archive_id: &str, now: Timestamp) -> Option<String> {
        let key = (node_id.clone(), archive_id.to_string());
        let entry = self.active.remove(&key)?;
        if now - entry.issued_at > CHALLENGE_VALIDITY_SECS {
            return None;
        }
        Some(entry.challenge)
    }

    pub fn prune_expired(&mut self, now: Timestamp) {
        self.active
            .retain(|_, c| now - c.issued_at <= CHALLENGE_VALIDITY_SECS);
    }
}
