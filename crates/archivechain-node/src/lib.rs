pub mod capabilities;
pub mod dht;
pub mod network;
pub mod node;

pub use capabilities::{NodeCapabilities, NodeMetrics, NodeStatus, NodeType};
pub use dht::dht_key;
pub use network::NodeNetwork;
pub use node::ArchiveNode;
