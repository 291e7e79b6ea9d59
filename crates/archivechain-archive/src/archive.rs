use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use archivechain_core::canonical::canonical_json_bytes;
use archivechain_core::constants::{
    MAX_REPLICATION_COUNT, MIN_REPLICATION_COUNT, POPULARITY_REPLICATION_THRESHOLD,
};
use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::{ArchiveId, NodeId};
use archivechain_crypto::checksum::compute_checksum;

use crate::metadata::{ArchiveMetadata, Compression};

/// The on-chain archive descriptor (spec §3 "ArchiveData").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveData {
    pub archive_id: ArchiveId,
    pub original_url: String,
    pub capture_timestamp: DateTime<Utc>,
    pub content_type: String,
    pub compression: Compression,
    pub size_original: u64,
    pub size_compressed: u64,
    pub checksum: String,
    pub metadata: ArchiveMetadata,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default = "default_replication_count")]
    pub replication_count: u32,
    #[serde(default)]
    pub storage_nodes: Vec<NodeId>,
}

fn default_replication_count() -> u32 {
    archivechain_core::constants::DEFAULT_REPLICATION_COUNT
}

impl ArchiveData {
    /// Build a new archive record from raw content, deriving `archive_id`
    /// (SHA-256 of the content) and a salted integrity `checksum`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        content: &[u8],
        salt: &[u8],
        original_url: String,
        capture_timestamp: DateTime<Utc>,
        content_type: String,
        compression: Compression,
        size_original: u64,
        size_compressed: u64,
        metadata: ArchiveMetadata,
    ) -> Result<Self, ArchiveChainError> {
        metadata.validate()?;
        let archive_id = hex::encode(Sha256::digest(content));
        let checksum = compute_checksum(content, salt);
        let archive = Self {
            archive_id,
            original_url,
            capture_timestamp,
            content_type,
            compression,
            size_original,
            size_compressed,
            checksum,
            metadata,
            block_height: None,
            replication_count: default_replication_count(),
            storage_nodes: Vec::new(),
        };
        archive.validate()?;
        Ok(archive)
    }

    /// Validate structural invariants (spec §4.3). Does not re-verify the
    /// checksum against content — callers with the raw bytes should use
    /// `archivechain_crypto::checksum::verify_checksum` for that.
    pub fn validate(&self) -> Result<(), ArchiveChainError> {
        if self.archive_id.trim().is_empty() {
            return Err(ArchiveChainError::InvalidArchive("empty archive_id".into()));
        }
        if self.original_url.trim().is_empty() {
            return Err(ArchiveChainError::InvalidArchive("empty original_url".into()));
        }
        if self.content_type.trim().is_empty() {
            return Err(ArchiveChainError::InvalidArchive("empty content_type".into()));
        }
        if self.checksum.trim().is_empty() {
            return Err(ArchiveChainError::InvalidArchive("empty checksum".into()));
        }
        if self.replication_count < MIN_REPLICATION_COUNT
            || self.replication_count > MAX_REPLICATION_COUNT
        {
            return Err(ArchiveChainError::InvalidArchive(format!(
                "replication_count {} outside [{MIN_REPLICATION_COUNT},{MAX_REPLICATION_COUNT}]",
                self.replication_count
            )));
        }
        self.metadata.validate()?;
        Ok(())
    }

    /// Bytes of compressed content plus serialized-metadata overhead.
    pub fn get_storage_requirement(&self) -> Result<u64, ArchiveChainError> {
        let metadata_bytes = canonical_json_bytes(&self.metadata)?;
        Ok(self.size_compressed + metadata_bytes.len() as u64)
    }

    /// An archive is "popular" once its replication count sits near the top
    /// of the legal `[1,15]` range.
    pub fn is_popular(&self) -> bool {
        self.replication_count > POPULARITY_REPLICATION_THRESHOLD
    }

    /// `YYYY-MM-DD` bucket used by the timestamp index.
    pub fn capture_date(&self) -> String {
        self.capture_timestamp.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> ArchiveMetadata {
        ArchiveMetadata {
            screenshots: vec![],
            external_resources: vec![],
            linked_pages: vec![],
            tags: vec!["news".into()],
            category: "article".into(),
            priority: 5,
            language: Some("en".into()),
            title: None,
            description: None,
        }
    }

    #[test]
    fn new_archive_computes_id_and_checksum() {
        let content = b"hello world";
        let archive = ArchiveData::new(
            content,
            b"fixed-salt-for-test-only-32bytes!",
            "https://example.com/a".into(),
            Utc::now(),
            "text/html".into(),
            Compression::None,
            content.len() as u64,
            content.len() as u64,
            sample_metadata(),
        )
        .unwrap();
        assert_eq!(archive.archive_id.len(), 64);
        assert!(archive.checksum.starts_with("pbkdf2_sha256_"));
        assert!(archive.validate().is_ok());
    }

    #[test]
    fn rejects_replication_count_out_of_range() {
        let mut archive = ArchiveData::new(
            b"x",
            b"salt",
            "https://example.com/b".into(),
            Utc::now(),
            "text/html".into(),
            Compression::None,
            1,
            1,
            sample_metadata(),
        )
        .unwrap();
        archive.replication_count = 16;
        assert!(archive.validate().is_err());
    }

    #[test]
    fn is_popular_uses_redefined_threshold() {
        let mut archive = ArchiveData::new(
            b"x",
            b"salt",
            "https://example.com/c".into(),
            Utc::now(),
            "text/html".into(),
            Compression::None,
            1,
            1,
            sample_metadata(),
        )
        .unwrap();
        archive.replication_count = 11;
        assert!(archive.is_popular());
        archive.replication_count = 10;
        assert!(!archive.is_popular());
    }
}
