//! Tagged-sum contract registry with a `(tag, function_name)` dispatch
//! table, replacing the original's class-hierarchy polymorphism per the
//! redesign direction for this protocol.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{Address, ArchiveId, NodeId, Timestamp};
use archivechain_safemath::Amount;

use crate::bounty::ArchiveBounty;
use crate::pool::PreservationPool;
use crate::verification::ContentVerification;

/// A deployed contract instance, tagged by type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Contract {
    Bounty(ArchiveBounty),
    Pool(PreservationPool),
    Verification(ContentVerification),
}

impl Contract {
    pub fn contract_id(&self) -> &str {
        match self {
            Contract::Bounty(c) => &c.id,
            Contract::Pool(c) => &c.id,
            Contract::Verification(c) => &c.id,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Contract::Bounty(_) => "ArchiveBounty",
            Contract::Pool(_) => "PreservationPool",
            Contract::Verification(_) => "ContentVerification",
        }
    }
}

#[derive(Default)]
pub struct ContractRegistry {
    contracts: HashMap<String, Contract>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deploy_bounty(
        &mut self,
        id: String,
        creator: Address,
        target_url: String,
        reward: Amount,
        deadline: Timestamp,
        now: Timestamp,
    ) -> Result<String, ArchiveChainError> {
        if self.contracts.contains_key(&id) {
            return Err(ArchiveChainError::InvalidContractCall(format!(
                "contract id already exists: {id}"
            )));
        }
        let contract = ArchiveBounty::new(id.clone(), creator, target_url, reward, deadline, now);
        self.contracts.insert(id.clone(), Contract::Bounty(contract));
        Ok(id)
    }

    pub fn deploy_pool(
        &mut self,
        id: String,
        creator: Address,
        target_archives: Vec<ArchiveId>,
        initial_funding: Amount,
        now: Timestamp,
    ) -> Result<String, ArchiveChainError> {
        if self.contracts.contains_key(&id) {
            return Err(ArchiveChainError::InvalidContractCall(format!(
                "contract id already exists: {id}"
            )));
        }
        let contract = PreservationPool::new(id.clone(), creator, target_archives, initial_funding, now)?;
        self.contracts.insert(id.clone(), Contract::Pool(contract));
        Ok(id)
    }

    pub fn deploy_verification(
        &mut self,
        id: String,
        creator: Address,
        now: Timestamp,
    ) -> Result<String, ArchiveChainError> {
        if self.contracts.contains_key(&id) {
            return Err(ArchiveChainError::InvalidContractCall(format!(
                "contract id already exists: {id}"
            )));
        }
        let contract = ContentVerification::new(id.clone(), creator, now);
        self.contracts.insert(id.clone(), Contract::Verification(contract));
        Ok(id)
    }

    pub fn get(&self, contract_id: &str) -> Option<&Contract> {
        self.contracts.get(contract_id)
    }

    pub fn contracts_by_type(&self, type_name: &str) -> Vec<&Contract> {
        self.contracts
            .values()
            .filter(|c| c.type_name() == type_name)
            .collect()
    }

    /// Dispatch `(contract_id, function_name, params, caller)`. Unknown
    /// contracts or functions fail with `ContractNotFound` /
    /// `InvalidContractCall`, matching spec §4.7 / §REDESIGN FLAGS exactly.
    pub fn execute_contract(
        &mut self,
        contract_id: &str,
        function_name: &str,
        params: Value,
        caller: &Address,
        now: Timestamp,
    ) -> Result<Value, ArchiveChainError> {
        let contract = self
            .contracts
            .get_mut(contract_id)
            .ok_or_else(|| ArchiveChainError::ContractNotFound(contract_id.to_string()))?;

        match contract {
            Contract::Bounty(bounty) => dispatch_bounty(bounty, function_name, params, caller, now),
            Contract::Pool(pool) => dispatch_pool(pool, function_name, params, caller, now),
            Contract::Verification(cv) => dispatch_verification(cv, function_name, params, caller, now),
        }
    }
}

fn param_str(params: &Value, key: &str) -> Result<String, ArchiveChainError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ArchiveChainError::InvalidContractCall(format!("missing param: {key}")))
}

fn param_bool(params: &Value, key: &str) -> Result<bool, ArchiveChainError> {
    params
        .get(key)
        .and_then(Value::as_bool)
        .ok_or_else(|| ArchiveChainError::InvalidContractCall(format!("missing param: {key}")))
}

fn dispatch_bounty(
    bounty: &mut ArchiveBounty,
    function_name: &str,
    params: Value,
    caller: &Address,
    now: Timestamp,
) -> Result<Value, ArchiveChainError> {
    match function_name {
        "claimBounty" => {
            let archive_hash = param_str(&params, "archive_hash")?;
            let ok = bounty.claim_bounty(caller.clone(), archive_hash, now)?;
            Ok(json!({ "success": ok }))
        }
        "verifySubmission" => {
            let is_valid = param_bool(&params, "is_valid")?;
            let payout = bounty.verify_submission(caller.clone(), is_valid, now)?;
            Ok(json!({
                "success": true,
                "payout": payout.map(|(to, amount)| json!({ "to": to.as_str(), "amount": amount.to_string() })),
            }))
        }
        "cancelBounty" => {
            let refund = bounty.cancel_bounty(caller, now)?;
            Ok(json!({
                "success": refund.is_some(),
                "refund": refund.map(|amount| json!({ "to": bounty.creator.as_str(), "amount": amount.to_string() })),
            }))
        }
        other => Err(ArchiveChainError::InvalidContractCall(format!("unknown function: {other}"))),
    }
}

fn dispatch_pool(
    pool: &mut PreservationPool,
    function_name: &str,
    params: Value,
    caller: &Address,
    now: Timestamp,
) -> Result<Value, ArchiveChainError> {
    match function_name {
        "contribute" => {
            let amount_str = param_str(&params, "amount")?;
            let amount = Amount::parse_arc_str(&amount_str)?;
            let ok = pool.contribute_to_pool(caller.clone(), amount, now)?;
            Ok(json!({ "success": ok }))
        }
        "registerPreserver" => {
            let archives: Vec<ArchiveId> = params
                .get("archives_stored")
                .and_then(Value::as_array)
                .map(|values| values.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
                .ok_or_else(|| ArchiveChainError::InvalidContractCall("missing param: archives_stored".into()))?;
            let node_id = NodeId::new(caller.as_str());
            let ok = pool.register_preserver(node_id, archives, now);
            Ok(json!({ "success": ok }))
        }
        "verifyPreservation" => {
            let node_id = NodeId::new(caller.as_str());
            let ok = pool.verify_preservation(&node_id, now);
            Ok(json!({ "success": ok }))
        }
        "distributeRewards" => {
            let rewards = pool.distribute_rewards(now)?;
            let rewards_json: HashMap<String, String> = rewards
                .into_iter()
                .map(|(node, amount)| (node.as_str().to_string(), amount.to_string()))
                .collect();
            Ok(json!({ "rewards": rewards_json }))
        }
        other => Err(ArchiveChainError::InvalidContractCall(format!("unknown function: {other}"))),
    }
}

fn dispatch_verification(
    cv: &mut ContentVerification,
    function_name: &str,
    params: Value,
    caller: &Address,
    now: Timestamp,
) -> Result<Value, ArchiveChainError> {
    match function_name {
        "submitVerification" => {
            let archive_id = param_str(&params, "archive_id")?;
            let checksum = param_str(&params, "checksum")?;
            let is_valid = param_bool(&params, "is_valid")?;
            let ok = cv.submit_verification(caller.clone(), &archive_id, checksum, is_valid, now)?;
            Ok(json!({ "success": ok }))
        }
        "getStatus" => {
            let archive_id = param_str(&params, "archive_id")?;
            let status = cv.get_verification_status(&archive_id);
            Ok(serde_json::to_value(status).unwrap_or(Value::Null))
        }
        other => Err(ArchiveChainError::InvalidContractCall(format!("unknown function: {other}"))),
    }
}
