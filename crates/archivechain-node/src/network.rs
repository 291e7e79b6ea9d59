//! The network-wide view over all locally-known nodes: discovery and
//! best-storage-node selection. Grounded on the original `NodeNetwork`.

use std::collections::HashMap;

use archivechain_core::types::{NodeId, Timestamp};

use crate::capabilities::NodeStatus;
use crate::node::ArchiveNode;

pub struct NodeNetwork {
    nodes: HashMap<NodeId, ArchiveNode>,
    network_start_time: Timestamp,
}

impl NodeNetwork {
    pub fn new(now: Timestamp) -> Self {
        Self {
            nodes: HashMap::new(),
            network_start_time: now,
        }
    }

    pub fn add_node(&mut self, node: ArchiveNode) -> bool {
        if self.nodes.contains_key(&node.node_id) {
            return false;
        }
        self.nodes.insert(node.node_id.clone(), node);
        true
    }

    pub fn remove_node(&mut self, node_id: &NodeId) -> bool {
        match self.nodes.remove(node_id) {
            Some(mut node) => {
                node.stop();
                true
            }
            None => false,
        }
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&ArchiveNode> {
        self.nodes.get(node_id)
    }

    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut ArchiveNode> {
        self.nodes.get_mut(node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn online_node_count(&self) -> usize {
        self.nodes.values().filter(|n| n.status == NodeStatus::Online).count()
    }

    /// Nodes other than `requesting_node_id`, currently online.
    pub fn discover_nodes(&self, requesting_node_id: &NodeId) -> Vec<&ArchiveNode> {
        self.nodes
            .values()
            .filter(|n| &n.node_id != requesting_node_id && n.status == NodeStatus::Online)
            .collect()
    }

    /// Rank online, capacity-eligible, specialization-eligible nodes by a
    /// storage/utilization/performance score and return the top `count`.
    pub fn find_best_storage_nodes(&self, content_type: &str, size_bytes: u64, count: usize) -> Vec<NodeId> {
        const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
        let mut scored: Vec<(NodeId, f64)> = self
            .nodes
            .values()
            .filter(|n| n.status == NodeStatus::Online)
            .filter(|n| n.capabilities.available_storage_bytes >= size_bytes)
            .filter(|n| {
                n.capabilities.content_specializations.is_empty()
                    || n.capabilities
                        .content_specializations
                        .iter()
                        .any(|ct| ct == content_type)
            })
            .map(|n| {
                let storage_factor = (n.capabilities.available_storage_bytes as f64 / GIB / 100.0).min(1.0);
                let utilization_factor = 1.0 - n.metrics.storage_utilization;
                let performance_factor = n.metrics.uptime_percentage / 100.0 * 0.5
                    + (1.0 - n.metrics.average_response_time_ms / 1000.0).max(0.0) * 0.5;
                let score = storage_factor * 0.3 + utilization_factor * 0.3 + performance_factor * 0.3 + 0.1;
                (n.node_id.clone(), score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().take(count).map(|(id, _)| id).collect()
    }

    pub fn network_uptime_secs(&self, now: Timestamp) -> i64 {
        now - self.network_start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{NodeCapabilities, NodeType};

    fn node(id: &str, available: u64) -> ArchiveNode {
        let caps = NodeCapabilities {
            storage_capacity_bytes: available,
            available_storage_bytes: available,
            bandwidth_capacity_bps: 0,
            cpu_cores: 1,
            ram_gb: 1,
            geographic_region: "us-east".into(),
            content_specializations: vec![],
        };
        let mut n = ArchiveNode::new(NodeId::new(id), NodeType::FullArchive, caps, 0);
        n.start();
        n
    }

    #[test]
    fn find_best_storage_nodes_excludes_under_capacity() {
        let mut net = NodeNetwork::new(0);
        net.add_node(node("small", 10));
        net.add_node(node("big", 1024 * 1024 * 1024 * 200));

        let best = net.find_best_storage_nodes("text/html", 1024 * 1024 * 1024 * 50, 3);
        assert_eq!(best, vec![NodeId::new("big")]);
    }

    #[test]
    fn discover_nodes_excludes_requester() {
        let mut net = NodeNetwork::new(0);
        net.add_node(node("a", 1000));
        net.add_node(node("b", 1000));

        let discovered = net.discover_nodes(&NodeId::new("a"));
        assert_eq!(discovered.len(), 1);
        assert_eq!(discovered[0].node_id, NodeId::new("b"));
    }
}
