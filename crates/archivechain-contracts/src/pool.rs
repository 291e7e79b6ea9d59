//! Preservation pool contract: pays monthly stipends to nodes that keep a
//! declared archive set alive. Grounded on the original `PreservationPool`.
//!
//! As with `ArchiveBounty`, actual fund movement (who debited the initial
//! funding, who receives a distribution) is the chain layer's job; this
//! contract tracks contributions and preserver registrations and reports
//! what a distribution round would pay.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::json;

use archivechain_core::constants::PRESERVATION_DISTRIBUTION_WINDOW_SECS;
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{Address, ArchiveId, NodeId, Timestamp};
use archivechain_safemath::{safe_divide, Amount};

use crate::event::ContractEvent;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreserverInfo {
    pub archives_stored: Vec<ArchiveId>,
    pub registration_time: Timestamp,
    pub last_verification: Timestamp,
    pub total_earned: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreservationPool {
    pub id: String,
    pub creator: Address,
    pub created_at: Timestamp,
    pub target_archives: Vec<ArchiveId>,
    pub total_funding: Amount,
    pub monthly_reward: Amount,
    pub contributors: HashMap<Address, Amount>,
    pub last_distribution: Timestamp,
    pub active_preservers: HashMap<NodeId, PreserverInfo>,
    pub events: Vec<ContractEvent>,
}

impl PreservationPool {
    pub fn new(
        id: String,
        creator: Address,
        target_archives: Vec<ArchiveId>,
        initial_funding: Amount,
        now: Timestamp,
    ) -> Result<Self, ArchiveChainError> {
        let monthly_reward = safe_divide(initial_funding, 12)?;
        let mut contributors = HashMap::new();
        contributors.insert(creator.clone(), initial_funding);

        let mut pool = Self {
            id,
            creator,
            created_at: now,
            target_archives,
            total_funding: initial_funding,
            monthly_reward,
            contributors,
            last_distribution: now,
            active_preservers: HashMap::new(),
            events: Vec::new(),
        };
        pool.emit(
            "PoolCreated",
            json!({ "target_archives": pool.target_archives, "initial_funding": initial_funding.to_string() }),
            now,
        );
        Ok(pool)
    }

    fn emit(&mut self, event_type: &str, data: serde_json::Value, now: Timestamp) {
        self.events.push(ContractEvent::new(&self.id, event_type, data, now));
    }

    pub fn contribute_to_pool(
        &mut self,
        contributor: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<bool, ArchiveChainError> {
        if amount == Amount::ZERO {
            return Ok(false);
        }
        self.total_funding = archivechain_safemath::safe_add(self.total_funding, amount)?;
        let current = self.contributors.get(&contributor).copied().unwrap_or(Amount::ZERO);
        self.contributors
            .insert(contributor.clone(), archivechain_safemath::safe_add(current, amount)?);
        self.monthly_reward = safe_divide(self.total_funding, 12)?;

        self.emit(
            "ContributionAdded",
            json!({ "contributor": contributor.as_str(), "amount": amount.to_string(), "total_funding": self.total_funding.to_string() }),
            now,
        );
        Ok(true)
    }

    /// A node may register only if it stores a superset of the pool's
    /// target archives.
    pub fn register_preserver(
        &mut self,
        node_id: NodeId,
        archives_stored: Vec<ArchiveId>,
        now: Timestamp,
    ) -> bool {
        let required: HashSet<&ArchiveId> = self.target_archives.iter().collect();
        let stored: HashSet<&ArchiveId> = archives_stored.iter().collect();
        if !required.is_subset(&stored) {
            return false;
        }
        self.active_preservers.insert(
            node_id.clone(),
            PreserverInfo {
                archives_stored: archives_stored.clone(),
                registration_time: now,
                last_verification: now,
                total_earned: Amount::ZERO,
            },
        );
        self.emit(
            "PreserverRegistered",
            json!({ "node_id": node_id.as_str(), "archives_count": archives_stored.len() }),
            now,
        );
        true
    }

    pub fn verify_preservation(&mut self, node_id: &NodeId, now: Timestamp) -> bool {
        let Some(info) = self.active_preservers.get_mut(node_id) else {
            return false;
        };
        info.last_verification = now;
        self.emit(
            "PreservationVerified",
            json!({ "node_id": node_id.as_str() }),
            now,
        );
        true
    }

    /// Idempotent per `PRESERVATION_DISTRIBUTION_WINDOW_SECS`: splits the
    /// monthly reward equally among preservers verified within the window.
    /// Returns the per-node payout map; empty when not yet due or no active
    /// preservers.
    pub fn distribute_rewards(
        &mut self,
        now: Timestamp,
    ) -> Result<HashMap<NodeId, Amount>, ArchiveChainError> {
        if now - self.last_distribution < PRESERVATION_DISTRIBUTION_WINDOW_SECS {
            return Ok(HashMap::new());
        }
        let active_nodes: Vec<NodeId> = self
            .active_preservers
            .iter()
            .filter(|(_, info)| now - info.last_verification <= PRESERVATION_DISTRIBUTION_WINDOW_SECS)
            .map(|(id, _)| id.clone())
            .collect();
        if active_nodes.is_empty() {
            return Ok(HashMap::new());
        }

        let reward_per_node = safe_divide(self.monthly_reward, active_nodes.len() as u128)?;
        let mut rewards = HashMap::new();
        for node_id in &active_nodes {
            rewards.insert(node_id.clone(), reward_per_node);
            if let Some(info) = self.active_preservers.get_mut(node_id) {
                info.total_earned = archivechain_safemath::safe_add(info.total_earned, reward_per_node)?;
            }
        }
        self.last_distribution = now;
        self.total_funding = archivechain_safemath::safe_subtract(self.total_funding, self.monthly_reward)?;

        self.emit(
            "RewardsDistributed",
            json!({ "recipients": active_nodes.len(), "total_distributed": self.monthly_reward.to_string(), "reward_per_node": reward_per_node.to_string() }),
            now,
        );
        Ok(rewards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_missing_target_archives() {
        let mut pool = PreservationPool::new(
            "pool-1".into(),
            Address::new("arc_creator"),
            vec!["a1".into(), "a2".into()],
            Amount::from_arc(1200),
            0,
        )
        .unwrap();
        assert!(!pool.register_preserver(NodeId::new("n1"), vec!["a1".into()], 0));
        assert!(pool.register_preserver(NodeId::new("n1"), vec!["a1".into(), "a2".into(), "a3".into()], 0));
    }

    #[test]
    fn distribution_is_idempotent_within_window() {
        let mut pool = PreservationPool::new(
            "pool-1".into(),
            Address::new("arc_creator"),
            vec!["a1".into()],
            Amount::from_arc(1200),
            0,
        )
        .unwrap();
        pool.register_preserver(NodeId::new("n1"), vec!["a1".into()], 0);

        let first = pool.distribute_rewards(PRESERVATION_DISTRIBUTION_WINDOW_SECS).unwrap();
        assert_eq!(first.get(&NodeId::new("n1")), Some(&Amount::from_arc(100)));

        let second = pool.distribute_rewards(PRESERVATION_DISTRIBUTION_WINDOW_SECS + 10).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn stale_preservers_are_excluded() {
        let mut pool = PreservationPool::new(
            "pool-1".into(),
            Address::new("arc_creator"),
            vec!["a1".into()],
            Amount::from_arc(1200),
            0,
        )
        .unwrap();
        pool.register_preserver(NodeId::new("n1"), vec!["a1".into()], 0);
        let rewards = pool
            .distribute_rewards(PRESERVATION_DISTRIBUTION_WINDOW_SECS * 10)
            .unwrap();
        assert!(rewards.is_empty());
    }
}
