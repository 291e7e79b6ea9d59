//! A single node's local view: storage inventory, DHT slice, peer table, and
//! rolling metrics. Grounded on the original `ArchiveNode` class; networking
//! itself (actual sockets, message framing) is out of scope per spec.md's
//! Non-goals — this models the state those messages would mutate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use archivechain_core::constants::{
    DHT_ENTRY_STALE_SECS, PEER_TIMEOUT_SECS, STORAGE_EVICTION_HIGH_WATERMARK,
    STORAGE_EVICTION_LOW_WATERMARK,
};
use archivechain_core::types::{ArchiveId, NodeId, Timestamp};

use crate::capabilities::{NodeCapabilities, NodeMetrics, NodeStatus, NodeType};
use crate::dht::dht_key;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredArchive {
    content_type: String,
    size_bytes: u64,
    stored_at: Timestamp,
    access_count: u64,
    last_accessed: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PeerInfo {
    last_seen: Timestamp,
    latency_ms: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveNode {
    pub node_id: NodeId,
    pub node_type: NodeType,
    pub status: NodeStatus,
    pub capabilities: NodeCapabilities,
    pub metrics: NodeMetrics,
    start_time: Timestamp,
    stored_archives: HashMap<ArchiveId, StoredArchive>,
    peers: HashMap<NodeId, PeerInfo>,
    dht_table: HashMap<String, Vec<NodeId>>,
}

impl ArchiveNode {
    pub fn new(node_id: NodeId, node_type: NodeType, capabilities: NodeCapabilities, now: Timestamp) -> Self {
        Self {
            node_id,
            node_type,
            status: NodeStatus::Offline,
            capabilities,
            metrics: NodeMetrics::new(now),
            start_time: now,
            stored_archives: HashMap::new(),
            peers: HashMap::new(),
            dht_table: HashMap::new(),
        }
    }

    pub fn start(&mut self) {
        self.status = NodeStatus::Online;
    }

    pub fn stop(&mut self) {
        self.status = NodeStatus::Offline;
        self.peers.clear();
    }

    fn used_storage_bytes(&self) -> u64 {
        self.stored_archives.values().map(|a| a.size_bytes).sum()
    }

    fn recompute_utilization(&mut self, now: Timestamp) {
        self.metrics.storage_utilization = if self.capabilities.storage_capacity_bytes > 0 {
            self.used_storage_bytes() as f64 / self.capabilities.storage_capacity_bytes as f64
        } else {
            0.0
        };
        self.metrics.last_updated = now;
    }

    /// Reject when capacity would be exceeded or the content type falls
    /// outside this node's specialization set (empty set = no restriction).
    pub fn store_archive(
        &mut self,
        archive_id: ArchiveId,
        content_type: &str,
        size_bytes: u64,
        now: Timestamp,
    ) -> bool {
        if self.used_storage_bytes() + size_bytes > self.capabilities.available_storage_bytes {
            tracing::warn!(node = %self.node_id, %archive_id, "store rejected: capacity exceeded");
            return false;
        }
        if !self.capabilities.content_specializations.is_empty()
            && !self
                .capabilities
                .content_specializations
                .iter()
                .any(|ct| ct == content_type)
        {
            tracing::warn!(node = %self.node_id, %archive_id, %content_type, "store rejected: outside specialization");
            return false;
        }

        self.stored_archives.insert(
            archive_id.clone(),
            StoredArchive {
                content_type: content_type.to_string(),
                size_bytes,
                stored_at: now,
                access_count: 0,
                last_accessed: now,
            },
        );
        self.dht_table
            .entry(dht_key(&archive_id))
            .or_default()
            .push(self.node_id.clone());
        self.capabilities.available_storage_bytes =
            self.capabilities.available_storage_bytes.saturating_sub(size_bytes);
        self.recompute_utilization(now);
        true
    }

    /// Record a local read: bumps access metadata and request-served count.
    pub fn retrieve_archive(&mut self, archive_id: &str, now: Timestamp) -> bool {
        let Some(record) = self.stored_archives.get_mut(archive_id) else {
            return false;
        };
        record.access_count += 1;
        record.last_accessed = now;
        self.metrics.total_requests_served += 1;
        true
    }

    /// Fold a served-bytes/response-time sample into the rolling average.
    pub fn record_service(&mut self, bytes_served: u64, response_time_ms: f64, now: Timestamp) {
        self.metrics.total_bytes_served += bytes_served;
        let n = self.metrics.total_requests_served.max(1) as f64;
        self.metrics.average_response_time_ms =
            (self.metrics.average_response_time_ms * (n - 1.0) + response_time_ms) / n;
        self.metrics.last_updated = now;
    }

    pub fn connect_to_peer(&mut self, peer_id: NodeId, latency_ms: f64, now: Timestamp) {
        self.peers.insert(peer_id, PeerInfo { last_seen: now, latency_ms });
    }

    pub fn disconnect_from_peer(&mut self, peer_id: &NodeId) {
        self.peers.remove(peer_id);
    }

    pub fn touch_peer(&mut self, peer_id: &NodeId, now: Timestamp) {
        if let Some(info) = self.peers.get_mut(peer_id) {
            info.last_seen = now;
        }
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn archive_count(&self) -> usize {
        self.stored_archives.len()
    }

    pub fn has_archive(&self, archive_id: &str) -> bool {
        self.stored_archives.contains_key(archive_id)
    }

    /// Local DHT lookup: providers known for `archive_id`'s key.
    pub fn find_providers(&self, archive_id: &str) -> &[NodeId] {
        self.dht_table.get(&dht_key(archive_id)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record that `provider` claims to store `archive_id` (e.g. from a
    /// peer's announcement), deduplicated.
    pub fn learn_provider(&mut self, archive_id: &str, provider: NodeId) {
        let entry = self.dht_table.entry(dht_key(archive_id)).or_default();
        if !entry.contains(&provider) {
            entry.push(provider);
        }
    }

    /// Evict DHT entries for providers we have not heard from recently
    /// (spec §4.9: `> 24h`). Our own entries never expire.
    fn cleanup_dht(&mut self, now: Timestamp) {
        let self_id = self.node_id.clone();
        let fresh_peers: std::collections::HashSet<NodeId> = self
            .peers
            .iter()
            .filter(|(_, info)| now - info.last_seen <= DHT_ENTRY_STALE_SECS)
            .map(|(id, _)| id.clone())
            .collect();

        self.dht_table.retain(|_, providers| {
            providers.retain(|p| *p == self_id || fresh_peers.contains(p));
            !providers.is_empty()
        });
    }

    /// Drop peers unseen for more than `PEER_TIMEOUT_SECS` (spec §4.9).
    fn check_peer_health(&mut self, now: Timestamp) {
        self.peers.retain(|_, info| now - info.last_seen <= PEER_TIMEOUT_SECS);
    }

    /// Once utilization exceeds `STORAGE_EVICTION_HIGH_WATERMARK`, evict
    /// least-recently-used archives until it falls to
    /// `STORAGE_EVICTION_LOW_WATERMARK` (spec §4.9).
    fn optimize_storage(&mut self, now: Timestamp) {
        if self.metrics.storage_utilization <= STORAGE_EVICTION_HIGH_WATERMARK {
            return;
        }
        let mut by_access: Vec<ArchiveId> = self.stored_archives.keys().cloned().collect();
        by_access.sort_by_key(|id| {
            let a = &self.stored_archives[id];
            (a.access_count, a.last_accessed)
        });

        for archive_id in by_access {
            if self.metrics.storage_utilization <= STORAGE_EVICTION_LOW_WATERMARK {
                break;
            }
            if let Some(record) = self.stored_archives.remove(&archive_id) {
                self.capabilities.available_storage_bytes += record.size_bytes;
                if let Some(providers) = self.dht_table.get_mut(&dht_key(&archive_id)) {
                    providers.retain(|p| *p != self.node_id);
                    if providers.is_empty() {
                        self.dht_table.remove(&dht_key(&archive_id));
                    }
                }
            }
            self.recompute_utilization(now);
        }
    }

    /// Run the periodic maintenance sweep: DHT GC, peer-health check, and
    /// (for storage-bearing node types) LRU eviction.
    pub fn perform_maintenance(&mut self, now: Timestamp) {
        self.cleanup_dht(now);
        self.check_peer_health(now);
        if matches!(self.node_type, NodeType::FullArchive | NodeType::LightStorage) {
            self.optimize_storage(now);
        }
        self.recompute_utilization(now);
        tracing::debug!(
            node = %self.node_id,
            peers = self.peers.len(),
            utilization = self.metrics.storage_utilization,
            "maintenance sweep complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(bytes: u64) -> NodeCapabilities {
        NodeCapabilities {
            storage_capacity_bytes: bytes,
            available_storage_bytes: bytes,
            bandwidth_capacity_bps: 0,
            cpu_cores: 1,
            ram_gb: 1,
            geographic_region: "us-east".into(),
            content_specializations: vec![],
        }
    }

    #[test]
    fn store_archive_rejects_over_capacity() {
        let mut node = ArchiveNode::new(NodeId::new("n1"), NodeType::LightStorage, capacity(100), 0);
        assert!(!node.store_archive("a1".into(), "text/html", 200, 0));
    }

    #[test]
    fn store_archive_rejects_outside_specialization() {
        let mut caps = capacity(1_000_000);
        caps.content_specializations = vec!["video/mp4".into()];
        let mut node = ArchiveNode::new(NodeId::new("n1"), NodeType::LightStorage, caps, 0);
        assert!(!node.store_archive("a1".into(), "text/html", 100, 0));
        assert!(node.store_archive("a2".into(), "video/mp4", 100, 0));
    }

    #[test]
    fn store_archive_populates_dht_with_self() {
        let mut node = ArchiveNode::new(NodeId::new("n1"), NodeType::FullArchive, capacity(1_000_000), 0);
        node.store_archive("a1".into(), "text/html", 100, 0);
        assert_eq!(node.find_providers("a1"), &[NodeId::new("n1")]);
    }

    #[test]
    fn maintenance_drops_unseen_peers() {
        let mut node = ArchiveNode::new(NodeId::new("n1"), NodeType::Relay, capacity(1), 0);
        node.connect_to_peer(NodeId::new("p1"), 10.0, 0);
        node.perform_maintenance(PEER_TIMEOUT_SECS + 1);
        assert_eq!(node.peer_count(), 0);
    }

    #[test]
    fn maintenance_evicts_lru_archives_above_high_watermark() {
        let mut node = ArchiveNode::new(NodeId::new("n1"), NodeType::FullArchive, capacity(100), 0);
        node.store_archive("old".into(), "text/html", 50, 0);
        node.retrieve_archive("old", 0);
        node.store_archive("new".into(), "text/html", 45, 10);
        // utilization = 95/100 = 0.95 > 0.9 watermark
        node.perform_maintenance(20);
        assert!(!node.has_archive("new") || !node.has_archive("old"));
        assert!(node.metrics.storage_utilization <= STORAGE_EVICTION_LOW_WATERMARK + f64::EPSILON);
    }
}
