//! Static node capabilities and rolling performance metrics, grounded on the
//! original `NodeCapabilities`/`NodeMetrics` dataclasses.

use serde::{Deserialize, Serialize};

use archivechain_core::types::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Stores complete archives, no size ceiling.
    FullArchive,
    /// Partial storage, specialized by content type.
    LightStorage,
    /// Facilitates routing without bulk storage.
    Relay,
    /// Public-facing read gateway.
    Gateway,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Offline,
    Starting,
    Online,
    Maintenance,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeCapabilities {
    pub storage_capacity_bytes: u64,
    pub available_storage_bytes: u64,
    pub bandwidth_capacity_bps: u64,
    pub cpu_cores: u32,
    pub ram_gb: u32,
    pub geographic_region: String,
    /// Content types this node will store. Empty means "no specialization,
    /// accepts anything" (matches the original's falsy-list check).
    pub content_specializations: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub uptime_percentage: f64,
    pub average_response_time_ms: f64,
    pub total_bytes_served: u64,
    pub total_requests_served: u64,
    pub storage_utilization: f64,
    pub last_updated: Timestamp,
}

impl NodeMetrics {
    pub fn new(now: Timestamp) -> Self {
        Self {
            uptime_percentage: 0.0,
            average_response_time_ms: 0.0,
            total_bytes_served: 0,
            total_requests_served: 0,
            storage_utilization: 0.0,
            last_updated: now,
        }
    }
}
