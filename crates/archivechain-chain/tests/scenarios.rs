//! End-to-end scenarios (spec.md §8, S1-S6): a sequence of a handful of
//! calls each, exercising the chain orchestrator the way a caller would.

use serde_json::json;

use archivechain_archive::{ArchiveData, ArchiveMetadata, Compression};
use archivechain_block::{Transaction, TxType};
use archivechain_chain::{ArchiveChain, ChainConfig};
use archivechain_consensus::StorageProof;
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{Address, NodeId};
use archivechain_crypto::KeyPair;
use archivechain_safemath::Amount;
use archivechain_token::GenesisAddresses;

/// Genesis wallets backed by real keypairs, so test code can sign transfers
/// out of them (an `Address::system(...)` wallet has no keypair and can
/// never satisfy a signature-required transaction).
struct FundedGenesis {
    genesis_addresses: GenesisAddresses,
    development_kp: KeyPair,
}

fn funded_genesis() -> FundedGenesis {
    let development_kp = KeyPair::generate();
    let genesis_addresses = GenesisAddresses {
        development: development_kp.address.clone(),
        ..GenesisAddresses::default()
    };
    FundedGenesis { genesis_addresses, development_kp }
}

fn new_chain(now: i64) -> (ArchiveChain, FundedGenesis) {
    let funded = funded_genesis();
    let genesis_kp = KeyPair::generate();
    let config = ChainConfig::new(genesis_kp.address.clone());
    let chain = ArchiveChain::genesis(config, funded.genesis_addresses.clone(), now).unwrap();
    (chain, funded)
}

/// Move `amount` ARC from the development wallet to `to`, signed, no fee.
fn fund(chain: &mut ArchiveChain, funded: &FundedGenesis, to: &Address, amount: Amount, now: i64) {
    chain.register_key(funded.development_kp.address.clone(), funded.development_kp.verifying_key).ok();
    let mut tx = Transaction::new_unsigned(
        TxType::Transfer,
        None,
        funded.development_kp.address.clone(),
        Some(to.clone()),
        amount,
        Amount::ZERO,
        now,
    );
    tx.sign(&funded.development_kp).unwrap();
    chain
        .transfer_tokens(
            funded.development_kp.address.clone(),
            to.clone(),
            amount,
            Amount::ZERO,
            tx.signature.clone(),
            now,
        )
        .unwrap();
}

fn sample_archive(url: &str) -> ArchiveData {
    let content = b"<html><body>archived page</body></html>";
    ArchiveData::new(
        content,
        b"test-salt",
        url.to_string(),
        chrono::DateTime::from_timestamp(0, 0).unwrap(),
        "text/html".to_string(),
        Compression::None,
        content.len() as u64,
        1024,
        ArchiveMetadata {
            screenshots: vec![],
            external_resources: vec![],
            linked_pages: vec![],
            tags: vec!["test".to_string()],
            category: "article".to_string(),
            priority: 5,
            language: Some("en".to_string()),
            title: None,
            description: None,
        },
    )
    .unwrap()
}

fn sign_archive_submission(chain: &ArchiveChain, archive: &ArchiveData, kp: &KeyPair, now: i64) -> String {
    let reward =
        archivechain_token::calculate_archive_reward(archive.size_compressed, 1.0, &archive.content_type)
            .unwrap();
    let mut tx = Transaction::new_unsigned(
        TxType::Archive,
        Some(archive.clone()),
        kp.address.clone(),
        None,
        reward,
        Amount::ZERO,
        now,
    );
    tx.sign(kp).unwrap();
    let _ = chain;
    tx.signature
}

/// Submit a large storage proof for `miner` so its PoA score clears
/// `MIN_ELIGIBLE_SCORE` and `mine_block` will admit it.
fn make_miner_eligible(chain: &mut ArchiveChain, miner: &Address, now: i64) {
    let node_id = NodeId::new(miner.as_str());
    let challenge = chain.generate_storage_challenge(node_id.clone(), "bootstrap".to_string(), now);
    let checksum = "deadbeefcafe";
    let response = {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(checksum.as_bytes());
        hasher.update(challenge.as_bytes());
        hex::encode(hasher.finalize())
    };
    let proof = StorageProof {
        node_id,
        archive_id: "bootstrap".to_string(),
        challenge,
        response,
        timestamp: now,
        file_size: 100 * 1024 * 1024 * 1024,
        checksum: checksum.to_string(),
    };
    assert!(chain.submit_storage_proof(proof, now).unwrap());
}

#[test]
fn s1_archive_then_mine() {
    let (mut chain, _funded) = new_chain(0);
    let archiver = KeyPair::generate();
    chain.register_key(archiver.address.clone(), archiver.verifying_key).unwrap();

    let archive = sample_archive("https://a");
    let signature = sign_archive_submission(&chain, &archive, &archiver, 10);
    chain
        .add_archive(archive, archiver.address.clone(), signature, 1.0, 10)
        .unwrap();
    assert_eq!(chain.mempool_len(), 1);

    let miner = KeyPair::generate();
    make_miner_eligible(&mut chain, &miner.address, 10);

    let block = chain.mine_block(miner.address.clone(), 20).unwrap();
    assert!(block.is_some());

    assert_eq!(chain.chain_length(), 2);
    assert!(chain.get_balance(&archiver.address) > Amount::ZERO);
    assert_eq!(chain.get_balance(&miner.address), Amount::from_arc(50));
    assert_eq!(chain.mempool_len(), 0);
    assert_eq!(chain.search_archives("a").len(), 1);
}

#[test]
fn s2_duplicate_url_rejected() {
    let (mut chain, _funded) = new_chain(0);
    let archiver = KeyPair::generate();
    chain.register_key(archiver.address.clone(), archiver.verifying_key).unwrap();

    let archive = sample_archive("https://dup");
    let signature = sign_archive_submission(&chain, &archive, &archiver, 10);
    chain
        .add_archive(archive.clone(), archiver.address.clone(), signature, 1.0, 10)
        .unwrap();
    assert_eq!(chain.mempool_len(), 1);

    let signature2 = sign_archive_submission(&chain, &archive, &archiver, 11);
    let err = chain
        .add_archive(archive, archiver.address.clone(), signature2, 1.0, 11)
        .unwrap_err();
    assert!(matches!(err, ArchiveChainError::DuplicateArchive(_)));
    assert_eq!(chain.mempool_len(), 1);
}

#[test]
fn s3_storage_proof_is_one_shot() {
    let (mut chain, _funded) = new_chain(0);
    let node_id = NodeId::new("n1");
    let challenge = chain.generate_storage_challenge(node_id.clone(), "arc1".to_string(), 0);

    let checksum = "chk";
    let response = {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(checksum.as_bytes());
        hasher.update(challenge.as_bytes());
        hex::encode(hasher.finalize())
    };

    let proof = StorageProof {
        node_id: node_id.clone(),
        archive_id: "arc1".to_string(),
        challenge: challenge.clone(),
        response: response.clone(),
        timestamp: 0,
        file_size: 2 * 1024 * 1024 * 1024,
        checksum: checksum.to_string(),
    };
    assert!(chain.submit_storage_proof(proof, 0).unwrap());

    // Resubmitting the same (consumed) challenge fails.
    let replay = StorageProof {
        node_id,
        archive_id: "arc1".to_string(),
        challenge,
        response,
        timestamp: 0,
        file_size: 2 * 1024 * 1024 * 1024,
        checksum: checksum.to_string(),
    };
    assert!(!chain.submit_storage_proof(replay, 1).unwrap());
}

#[test]
fn s4_bounty_happy_path() {
    let (mut chain, funded) = new_chain(0);
    let creator = KeyPair::generate();
    fund(&mut chain, &funded, &creator.address, Amount::from_arc(1000), 0);
    assert_eq!(chain.get_balance(&creator.address), Amount::from_arc(1000));

    chain
        .deploy_contract(
            "ArchiveBounty",
            "bounty-1".to_string(),
            creator.address.clone(),
            json!({
                "target_url": "https://preserve.example",
                "reward": "500",
                "deadline": 86_400,
            }),
            0,
        )
        .unwrap();
    assert_eq!(chain.get_balance(&creator.address), Amount::from_arc(500));

    let claimant = Address::new("arc_claimant");
    let result = chain
        .execute_contract(
            "bounty-1",
            "claimBounty",
            json!({ "archive_hash": "deadbeef" }),
            &claimant,
            10,
        )
        .unwrap();
    assert_eq!(result["success"], json!(true));

    for v in ["v1", "v2", "v3"] {
        chain
            .execute_contract("bounty-1", "verifySubmission", json!({ "is_valid": true }), &Address::new(v), 20)
            .unwrap();
    }

    assert_eq!(chain.get_balance(&claimant), Amount::from_arc(500));
}

#[test]
fn s5_transfer_burns_fee() {
    let (mut chain, funded) = new_chain(0);
    let a = KeyPair::generate();
    let b = Address::new("arc_b");
    fund(&mut chain, &funded, &a.address, Amount::from_arc(1000), 0);

    let total_before = chain.conservation_total().unwrap();

    let mut tx = Transaction::new_unsigned(
        TxType::Transfer,
        None,
        a.address.clone(),
        Some(b.clone()),
        Amount::from_arc(100),
        Amount::from_arc(10),
        10,
    );
    tx.sign(&a).unwrap();
    chain
        .transfer_tokens(a.address.clone(), b.clone(), Amount::from_arc(100), Amount::from_arc(10), tx.signature, 10)
        .unwrap();

    assert_eq!(chain.get_balance(&a.address), Amount::from_arc(890));
    assert_eq!(chain.get_balance(&b), Amount::from_arc(100));
    assert_eq!(chain.total_burned(), Amount::from_arc(1));
    assert_eq!(chain.conservation_total().unwrap(), total_before);
}

#[test]
fn s6_unsigned_transaction_rejected() {
    let (mut chain, _funded) = new_chain(0);
    let archiver = KeyPair::generate();
    chain.register_key(archiver.address.clone(), archiver.verifying_key).unwrap();

    let archive = sample_archive("https://unsigned");
    let err = chain
        .add_archive(archive, archiver.address.clone(), String::new(), 1.0, 10)
        .unwrap_err();
    assert!(matches!(err, ArchiveChainError::InvalidSignature));

    assert_eq!(chain.mempool_len(), 0);
    assert_eq!(chain.get_balance(&archiver.address), Amount::ZERO);
    assert!(chain.get_archive_by_url("https://unsigned").is_none());
}
