use serde::{Deserialize, Serialize};

use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::ArchiveId;

/// Supported compression algorithms for archived content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Gzip,
    Zstd,
    Brotli,
}

/// Descriptive metadata attached to an archive, immutable once the archive is
/// included in a block.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub external_resources: Vec<String>,
    #[serde(default)]
    pub linked_pages: Vec<ArchiveId>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
    pub priority: u8,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ArchiveMetadata {
    pub fn validate(&self) -> Result<(), ArchiveChainError> {
        if self.priority < 1 || self.priority > 10 {
            return Err(ArchiveChainError::InvalidArchive(format!(
                "priority {} outside 1..=10",
                self.priority
            )));
        }
        if self.category.trim().is_empty() {
            return Err(ArchiveChainError::InvalidArchive("empty category".into()));
        }
        Ok(())
    }
}
