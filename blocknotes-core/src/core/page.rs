use crate::core::block::{Block, BlockData, BlockType, PageId};
use crate::{BlocknotesError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A node in the document tree owning an ordered sequence of blocks.
///
/// Folders are structurally identical to pages; `is_folder` only changes how
/// the sidebar presents them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PageId>,
    #[serde(default)]
    pub content: Vec<Block>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Page {
    /// Builds a new active page with a fresh id and a single empty text block.
    pub fn new(title: impl Into<String>, icon: impl Into<String>, parent_id: Option<PageId>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            icon: icon.into(),
            parent_id,
            content: vec![Block::new(BlockType::Text)],
            created_at: now,
            updated_at: now,
            is_folder: false,
            is_deleted: false,
        }
    }

    /// Builds a new folder; see [`Page::new`].
    pub fn new_folder(title: impl Into<String>, icon: impl Into<String>, parent_id: Option<PageId>) -> Self {
        Self {
            is_folder: true,
            ..Self::new(title, icon, parent_id)
        }
    }

    /// Returns the position of `block_id` in this page's block sequence.
    #[must_use]
    pub fn block_index(&self, block_id: &str) -> Option<usize> {
        self.content.iter().position(|b| b.id == block_id)
    }

    #[must_use]
    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.content.iter().find(|b| b.id == block_id)
    }

    pub(crate) fn block_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        self.content.iter_mut().find(|b| b.id == block_id)
    }

    /// Refreshes `updated_at`.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Checks that block ids are unique and every payload fits its block type.
    ///
    /// # Errors
    ///
    /// Returns [`BlocknotesError::InvalidState`] for a repeated block id and
    /// [`BlocknotesError::InvalidBlockData`] for a mismatched payload.
    pub fn validate(&self) -> Result<()> {
        let mut block_ids = HashSet::new();
        for block in &self.content {
            if !block_ids.insert(block.id.as_str()) {
                return Err(BlocknotesError::InvalidState(format!(
                    "duplicate block id {}",
                    block.id
                )));
            }
            if let Some(data) = &block.data {
                if !data.fits(block.block_type) {
                    return Err(BlocknotesError::InvalidBlockData(format!(
                        "block {} carries data for another block type",
                        block.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Gives every `page` block without a payload the unlinked placeholder.
    /// Returns how many blocks were repaired.
    pub(crate) fn link_placeholders(&mut self) -> usize {
        let mut repaired = 0;
        for block in &mut self.content {
            if block.block_type == BlockType::Page && block.data.is_none() {
                block.data = Some(BlockData::empty_page_ref());
                repaired += 1;
            }
        }
        repaired
    }

    /// Case-insensitive match against the title or any block's content.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self
                .content
                .iter()
                .any(|b| b.content.to_lowercase().contains(&query))
    }
}
