use std::collections::{HashMap, HashSet};

use archivechain_core::error::ArchiveChainError;
use archivechain_core::types::ArchiveId;

use crate::archive::ArchiveData;

/// Derived lookup structure over the chain's archives. Entirely rebuildable
/// from `chain` — holds no state of its own that isn't recoverable by
/// replaying `add_archive` over every archive transaction.
#[derive(Default)]
pub struct ArchiveIndex {
    url_index: HashMap<String, ArchiveId>,
    content_index: HashMap<String, Vec<ArchiveId>>,
    timestamp_index: HashMap<String, Vec<ArchiveId>>,
    tag_index: HashMap<String, Vec<ArchiveId>>,
}

impl ArchiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index from scratch over the given archives, in order.
    pub fn rebuild(archives: &[ArchiveData]) -> Result<Self, ArchiveChainError> {
        let mut index = Self::new();
        for archive in archives {
            index.add_archive(archive)?;
        }
        Ok(index)
    }

    pub fn add_archive(&mut self, archive: &ArchiveData) -> Result<(), ArchiveChainError> {
        if self.url_index.contains_key(&archive.original_url) {
            return Err(ArchiveChainError::DuplicateArchive(
                archive.original_url.clone(),
            ));
        }
        self.url_index
            .insert(archive.original_url.clone(), archive.archive_id.clone());
        self.content_index
            .entry(archive.content_type.clone())
            .or_default()
            .push(archive.archive_id.clone());
        self.timestamp_index
            .entry(archive.capture_date())
            .or_default()
            .push(archive.archive_id.clone());
        for tag in &archive.metadata.tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .push(archive.archive_id.clone());
        }
        Ok(())
    }

    pub fn find_by_url(&self, url: &str) -> Option<&ArchiveId> {
        self.url_index.get(url)
    }

    pub fn find_by_content_type(&self, content_type: &str) -> &[ArchiveId] {
        self.content_index
            .get(content_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find_by_date(&self, date: &str) -> &[ArchiveId] {
        self.timestamp_index
            .get(date)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find_by_tag(&self, tag: &str) -> &[ArchiveId] {
        self.tag_index.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Union of URL-substring and tag-substring matches, case-insensitive.
    pub fn search(&self, query: &str) -> Vec<ArchiveId> {
        let needle = query.to_lowercase();
        let mut results: HashSet<ArchiveId> = HashSet::new();

        for (url, archive_id) in &self.url_index {
            if url.to_lowercase().contains(&needle) {
                results.insert(archive_id.clone());
            }
        }
        for (tag, archive_ids) in &self.tag_index {
            if tag.to_lowercase().contains(&needle) {
                results.extend(archive_ids.iter().cloned());
            }
        }

        results.into_iter().collect()
    }
}
