//! archivechain-cli — a demonstration binary that wires a chain end-to-end
//! in a single process: genesis, an archive submission, mining, and a
//! snapshot save. No P2P/RPC surface (spec.md's Non-goals put both out of
//! scope); this is the library's smoke-test harness, grounded on the
//! reference workspace's node binary's startup sequence and logging setup.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use archivechain_archive::{ArchiveData, ArchiveMetadata, Compression};
use archivechain_chain::{ArchiveChain, ChainConfig};
use archivechain_core::types::Timestamp;
use archivechain_crypto::KeyPair;
use archivechain_safemath::Amount;
use archivechain_token::GenesisAddresses;

#[derive(Parser, Debug)]
#[command(
    name = "archivechain-cli",
    version,
    about = "ArchiveChain demonstration harness — genesis, archive, mine, snapshot"
)]
struct Args {
    /// Where to write the JSON chain snapshot.
    #[arg(long, default_value = "archivechain-snapshot.json")]
    snapshot_path: PathBuf,

    /// URL to archive in the demonstration run.
    #[arg(long, default_value = "https://example.com/")]
    archive_url: String,

    /// Unix timestamp to treat as "now" (defaults to a fixed demo instant so
    /// runs are reproducible without a wall-clock dependency).
    #[arg(long, default_value_t = 1_700_000_000)]
    now: Timestamp,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,archivechain=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    info!("ArchiveChain demonstration run starting");

    let genesis_kp = KeyPair::generate();
    let config = ChainConfig::new(genesis_kp.address.clone());
    let mut chain = ArchiveChain::genesis(config, GenesisAddresses::default(), args.now)
        .context("constructing genesis chain")?;
    info!(genesis_address = %genesis_kp.address, "genesis block applied");

    let archiver_kp = KeyPair::generate();
    chain
        .register_key(archiver_kp.address.clone(), archiver_kp.verifying_key)
        .context("registering archiver key")?;

    let content = b"<html><body>hello, archive</body></html>";
    let archive = ArchiveData::new(
        content,
        b"demo-salt",
        args.archive_url.clone(),
        chrono::DateTime::from_timestamp(args.now, 0).unwrap_or_else(chrono::Utc::now),
        "text/html".to_string(),
        Compression::None,
        content.len() as u64,
        content.len() as u64,
        ArchiveMetadata {
            screenshots: vec![],
            external_resources: vec![],
            linked_pages: vec![],
            tags: vec!["demo".to_string()],
            category: "article".to_string(),
            priority: 5,
            language: Some("en".to_string()),
            title: Some("Example Domain".to_string()),
            description: None,
        },
    )
    .context("building archive record")?;

    let rarity_score = 1.0;
    let signature = sign_archive_submission(&archive, &archiver_kp, args.now)
        .context("signing archive submission")?;
    let tx_id = chain
        .add_archive(archive.clone(), archiver_kp.address.clone(), signature, rarity_score, args.now)
        .context("submitting archive")?;
    info!(%tx_id, url = %args.archive_url, "archive admitted to mempool");

    match chain.mine_block(genesis_kp.address.clone(), args.now + 1)? {
        Some(block) => info!(height = block.header.block_height, hash = %block.hash, "block mined"),
        None => info!("no block produced (no eligible validator or exhausted reward pool)"),
    }

    chain.save_to_file(&args.snapshot_path).context("saving chain snapshot")?;
    info!(path = %args.snapshot_path.display(), "snapshot saved");

    println!(
        "chain length: {}, mempool: {}, difficulty: {}, archiver balance: {} ARC",
        chain.chain_length(),
        chain.mempool_len(),
        chain.difficulty(),
        chain.get_balance(&archiver_kp.address),
    );

    Ok(())
}

/// Reproduce exactly the transaction body `ArchiveChain::add_archive` will
/// build internally, so the signature verifies against the chain's own
/// reconstruction.
fn sign_archive_submission(
    archive: &ArchiveData,
    keypair: &KeyPair,
    now: Timestamp,
) -> anyhow::Result<String> {
    let reward = archivechain_token::calculate_archive_reward(
        archive.size_compressed,
        1.0,
        &archive.content_type,
    )?;
    let mut tx = archivechain_block::Transaction::new_unsigned(
        archivechain_block::TxType::Archive,
        Some(archive.clone()),
        keypair.address.clone(),
        None,
        reward,
        Amount::ZERO,
        now,
    );
    tx.sign(keypair)?;
    Ok(tx.signature)
}
