//! Block-sequence operations on a page.

use crate::core::block::{Block, BlockData, BlockId, BlockType, BlockUpdate};
use crate::core::page::Page;
use crate::core::state::DocumentState;
use crate::{BlocknotesError, Result};

impl DocumentState {
    /// Inserts an empty block of `block_type` after `after_block_id`, or at the
    /// end when that id is absent or not on the page. Returns the new block id.
    pub(crate) fn add_block(
        &mut self,
        page_id: &str,
        block_type: BlockType,
        after_block_id: Option<&str>,
    ) -> Result<BlockId> {
        let page = self.require_page_mut(page_id)?;
        let block = Block::new(block_type);
        let block_id = block.id.clone();

        match after_block_id.and_then(|id| page.block_index(id)) {
            Some(index) => page.content.insert(index + 1, block),
            None => page.content.push(block),
        }
        page.touch();
        Ok(block_id)
    }

    pub(crate) fn delete_block(&mut self, page_id: &str, block_id: &str) -> Result<()> {
        let page = self.require_page_mut(page_id)?;
        let index = page
            .block_index(block_id)
            .ok_or_else(|| BlocknotesError::BlockNotFound(block_id.to_string()))?;
        page.content.remove(index);
        page.touch();
        Ok(())
    }

    /// Shallow-merges `updates` into the block.
    ///
    /// A supplied `data` payload must fit the block's type.
    pub(crate) fn update_block(
        &mut self,
        page_id: &str,
        block_id: &str,
        updates: &BlockUpdate,
    ) -> Result<()> {
        let page = self.require_page_mut(page_id)?;
        let block = page
            .block_mut(block_id)
            .ok_or_else(|| BlocknotesError::BlockNotFound(block_id.to_string()))?;

        if let Some(data) = &updates.data {
            if !data.fits(block.block_type) {
                return Err(BlocknotesError::InvalidBlockData(format!(
                    "{data:?} on a {:?} block",
                    block.block_type
                )));
            }
        }

        if let Some(content) = &updates.content {
            block.content = content.clone();
        }
        if let Some(properties) = &updates.properties {
            block.properties = properties.clone();
        }
        if let Some(data) = &updates.data {
            block.data = Some(data.clone());
        }
        page.touch();
        Ok(())
    }

    /// Rewrites a block's type in place.
    ///
    /// Properties are always reset and content survives only with
    /// `keep_content`. The payload is replaced by the new type's seed: the
    /// unlinked placeholder for `page`, a starter grid for tables and
    /// databases, nothing otherwise.
    pub(crate) fn convert_block(
        &mut self,
        page_id: &str,
        block_id: &str,
        block_type: BlockType,
        keep_content: bool,
    ) -> Result<()> {
        let page = self.require_page_mut(page_id)?;
        let block = page
            .block_mut(block_id)
            .ok_or_else(|| BlocknotesError::BlockNotFound(block_id.to_string()))?;

        block.block_type = block_type;
        block.properties = Default::default();
        if !keep_content {
            block.content.clear();
        }
        block.data = BlockData::seed_for(block_type);
        page.touch();
        Ok(())
    }

    /// Moves the block at `from_index` to `to_index`.
    pub(crate) fn reorder_blocks(&mut self, page_id: &str, from_index: usize, to_index: usize) -> Result<()> {
        let page = self.require_page_mut(page_id)?;
        let len = page.content.len();
        for index in [from_index, to_index] {
            if index >= len {
                return Err(BlocknotesError::IndexOutOfRange { index, len });
            }
        }
        if from_index == to_index {
            return Ok(());
        }

        let block = page.content.remove(from_index);
        page.content.insert(to_index, block);
        page.touch();
        Ok(())
    }

    /// Continues a list: inserts an empty block of the same type right after
    /// `block_id`, copying its properties. `indent` forces indentation on;
    /// otherwise the source's indentation is inherited.
    pub(crate) fn add_list_item(&mut self, page_id: &str, block_id: &str, indent: bool) -> Result<BlockId> {
        let page = self.require_page_mut(page_id)?;
        let index = page
            .block_index(block_id)
            .ok_or_else(|| BlocknotesError::BlockNotFound(block_id.to_string()))?;

        let source = &page.content[index];
        let mut item = Block::new(source.block_type);
        item.properties = source.properties.clone();
        if indent {
            item.properties.indent = Some(true);
        }
        let item_id = item.id.clone();

        page.content.insert(index + 1, item);
        page.touch();
        Ok(item_id)
    }

    /// Turns an existing block into a link to `target_page_id`.
    ///
    /// The target is not checked; a dangling link is a valid state.
    pub(crate) fn attach_page_reference(
        &mut self,
        page_id: &str,
        block_id: &str,
        target_page_id: &str,
    ) -> Result<()> {
        let page = self.require_page_mut(page_id)?;
        let block = page
            .block_mut(block_id)
            .ok_or_else(|| BlocknotesError::BlockNotFound(block_id.to_string()))?;

        block.block_type = BlockType::Page;
        block.content.clear();
        block.data = Some(BlockData::PageRef {
            page_id: target_page_id.to_string(),
        });
        page.touch();
        Ok(())
    }

    /// Appends a new link block to `target_page_id` at the end of `page_id`.
    pub(crate) fn append_page_reference(&mut self, page_id: &str, target_page_id: &str) -> Result<BlockId> {
        let page = self.require_page_mut(page_id)?;
        let block = Block::page_reference(target_page_id);
        let block_id = block.id.clone();
        page.content.push(block);
        page.touch();
        Ok(block_id)
    }
}

/// Display number of the numbered-list item at `index` in `blocks`.
///
/// Counts the contiguous run of numbered-list blocks ending at `index`; any
/// other block type restarts the count. Returns `None` if the block at `index`
/// is not a numbered-list item or `index` is out of range.
#[must_use]
pub fn numbered_list_index(blocks: &[Block], index: usize) -> Option<usize> {
    if blocks.get(index)?.block_type != BlockType::NumberedList {
        return None;
    }
    let run = blocks[..=index]
        .iter()
        .rev()
        .take_while(|b| b.block_type == BlockType::NumberedList)
        .count();
    Some(run)
}

impl Page {
    /// Display number of the numbered-list block `block_id`; see [`numbered_list_index`].
    #[must_use]
    pub fn list_number(&self, block_id: &str) -> Option<usize> {
        numbered_list_index(&self.content, self.block_index(block_id)?)
    }
}
