use serde::{Deserialize, Serialize};

use archivechain_core::types::Timestamp;

/// Append-only contract event, grounded on the original `ContractEvent`
/// dataclass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractEvent {
    pub event_type: String,
    pub contract_id: String,
    pub timestamp: Timestamp,
    pub data: serde_json::Value,
    pub tx_hash: String,
}

impl ContractEvent {
    pub fn new(
        contract_id: &str,
        event_type: &str,
        data: serde_json::Value,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            event_type: event_type.to_string(),
            contract_id: contract_id.to_string(),
            timestamp,
            data,
            tx_hash: String::new(),
        }
    }
}

/// Base contract lifecycle state (spec §4.7). Individual contract types carry
/// their own richer status (e.g. `BountyStatus`); this tracks whether the
/// contract as a whole is still live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractState {
    Active,
    Completed,
    Expired,
    Cancelled,
}
