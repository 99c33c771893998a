//! The document aggregate and the reducer that applies commands to it.

use crate::core::block::{Block, BlockType, PageId};
use crate::core::command::Command;
use crate::core::config::StoreConfig;
use crate::core::index::ReferenceIndex;
use crate::core::page::Page;
use crate::{BlocknotesError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which top-level view the editor is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Pages,
    Trash,
    Settings,
}

/// The full document aggregate: every page plus the pointers into it.
///
/// A `DocumentState` is a value. Commands never mutate a state in place;
/// [`DocumentState::apply`] returns the next state and leaves `self` untouched,
/// so any holder of an earlier snapshot keeps a consistent view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentState {
    /// All pages, active and trashed, in insertion order.
    pub pages: Vec<Page>,
    #[serde(default)]
    pub current_page_id: Option<PageId>,
    /// Favorited page ids. Entries may dangle after a page is purged.
    #[serde(default)]
    pub favorites: Vec<PageId>,
    #[serde(default)]
    pub current_view: View,
    #[serde(default)]
    pub selected_trash_page_ids: Vec<PageId>,
}

impl DocumentState {
    /// An empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The first-run document: a welcome page plus a small project folder.
    #[must_use]
    pub fn welcome() -> Self {
        let mut welcome = Page::new("Welcome", "👋", None);
        welcome.content = vec![
            Block::with_content(BlockType::Heading1, "Welcome to Blocknotes"),
            Block::with_content(
                BlockType::Text,
                "This is your first page. You can start typing here.",
            ),
            Block::with_content(BlockType::Heading2, "Features:"),
            Block::with_content(BlockType::BulletList, "Nested pages and subpages"),
            Block::with_content(BlockType::BulletList, "Drag and drop to reorder blocks and pages"),
            Block::with_content(BlockType::BulletList, "Favorites and Trash"),
            Block::with_content(BlockType::Text, "Feel free to explore and create your own notes!"),
        ];

        let mut projects = Page::new_folder("My Projects", "📁", None);
        projects.content = vec![Block::with_content(BlockType::Text, "This is a project folder.")];

        let mut meeting = Page::new("Meeting Notes", "📝", Some(projects.id.clone()));
        meeting.content = vec![Block::with_content(BlockType::Text, "Notes from the weekly meeting.")];

        let mut ideas = Page::new("Ideas", "💡", Some(projects.id.clone()));
        ideas.content = vec![Block::with_content(BlockType::Text, "Brainstorming new features.")];

        Self {
            current_page_id: Some(welcome.id.clone()),
            pages: vec![welcome, projects, meeting, ideas],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub(crate) fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == page_id)
    }

    /// Like [`Self::page_mut`] but reports a missing page as an error.
    pub(crate) fn require_page_mut(&mut self, page_id: &str) -> Result<&mut Page> {
        self.page_mut(page_id)
            .ok_or_else(|| BlocknotesError::PageNotFound(page_id.to_string()))
    }

    pub(crate) fn require_page(&self, page_id: &str) -> Result<&Page> {
        self.page(page_id)
            .ok_or_else(|| BlocknotesError::PageNotFound(page_id.to_string()))
    }

    #[must_use]
    pub fn contains_page(&self, page_id: &str) -> bool {
        self.page(page_id).is_some()
    }

    /// Builds the derived relationship index for this snapshot.
    #[must_use]
    pub fn index(&self) -> ReferenceIndex<'_> {
        ReferenceIndex::build(self)
    }

    /// Applies `command` and returns the resulting state.
    ///
    /// Never fails: a command that does not apply (unknown id, out-of-range
    /// index, cyclic reparent, ...) yields a state equal to `self`. The reason
    /// is logged at debug level; use [`Self::try_apply`] to observe it.
    #[must_use]
    pub fn apply(&self, command: &Command, config: &StoreConfig) -> DocumentState {
        match self.try_apply(command, config) {
            Ok(next) => next,
            Err(e) => {
                log::debug!("{} ignored: {e}", command.name());
                self.clone()
            }
        }
    }

    /// Applies `command`, returning the next state or the reason it did not apply.
    ///
    /// The command runs against a private copy of the state; a failure part-way
    /// through discards the copy, so `self` is never observed half-updated.
    ///
    /// # Errors
    ///
    /// Returns [`BlocknotesError::PageNotFound`] or
    /// [`BlocknotesError::BlockNotFound`] for unknown ids,
    /// [`BlocknotesError::InvalidMove`] for a reparent that would create a cycle,
    /// [`BlocknotesError::IndexOutOfRange`] for a bad reorder, and
    /// [`BlocknotesError::InvalidBlockData`] for a payload that does not fit its block.
    pub fn try_apply(&self, command: &Command, config: &StoreConfig) -> Result<DocumentState> {
        let mut next = self.clone();
        next.execute(command, config)?;
        Ok(next)
    }

    fn execute(&mut self, command: &Command, config: &StoreConfig) -> Result<()> {
        match command {
            Command::InitializeState(state) => {
                let mut replacement = (**state).clone();
                replacement.normalize()?;
                *self = replacement;
                Ok(())
            }
            Command::AddPage(page) => self.add_page((**page).clone()),
            Command::SetCurrentPage(page_id) => self.set_current_page(page_id.as_deref()),
            Command::SetCurrentView(view) => {
                self.set_current_view(*view);
                Ok(())
            }
            Command::ToggleFavorite(page_id) => self.toggle_favorite(page_id),
            Command::DeletePage(page_id) => self.delete_page(page_id, &config.trash).map(drop),
            Command::RestorePage(page_id) => self.restore_page(page_id).map(drop),
            Command::DuplicatePage(page_id) => {
                self.duplicate_page(page_id, &config.duplicate_suffix).map(drop)
            }
            Command::ReorderBlocks {
                page_id,
                from_index,
                to_index,
            } => self.reorder_blocks(page_id, *from_index, *to_index),
            Command::UpdateBlock {
                page_id,
                block_id,
                updates,
            } => self.update_block(page_id, block_id, updates),
            Command::AddBlock {
                page_id,
                after_block_id,
                block_type,
            } => self
                .add_block(page_id, *block_type, after_block_id.as_deref())
                .map(drop),
            Command::DeleteBlock { page_id, block_id } => self.delete_block(page_id, block_id),
            Command::ConvertBlockInline {
                page_id,
                block_id,
                block_type,
                keep_content,
            } => self.convert_block(page_id, block_id, *block_type, *keep_content),
            Command::AddListItem {
                page_id,
                block_id,
                indent,
            } => self.add_list_item(page_id, block_id, *indent).map(drop),
            Command::AddPageReference {
                page_id,
                block_id,
                reference_page_id,
            } => self.attach_page_reference(page_id, block_id, reference_page_id),
            Command::AddPageReferenceToParent {
                parent_page_id,
                reference_page_id,
            } => self
                .append_page_reference(parent_page_id, reference_page_id)
                .map(drop),
            Command::UpdatePageParent {
                page_id,
                new_parent_id,
            } => self.update_page_parent(page_id, new_parent_id.as_deref()),
            Command::UpdatePageTitle { page_id, new_title } => {
                self.update_page_title(page_id, new_title)
            }
            Command::TogglePageSelectionInTrash(page_id) => self.toggle_trash_selection(page_id),
            Command::SelectAllTrashPages(select) => {
                self.select_all_trash(*select);
                Ok(())
            }
            Command::PermanentlyDeletePage(page_id) => self
                .purge_pages(std::slice::from_ref(page_id), &config.trash)
                .map(drop),
            Command::PermanentlyDeleteSelectedTrash(ids) => {
                self.purge_pages(ids, &config.trash).map(drop)
            }
            Command::PermanentlyDeleteAllTrash => self.purge_all_trash(&config.trash).map(drop),
            Command::RestoreSelectedTrash(ids) => self.restore_pages(ids).map(drop),
            Command::RestoreAllTrash => self.restore_all_trash().map(drop),
        }
    }

    /// Checks the structural invariants of this state.
    ///
    /// # Errors
    ///
    /// Returns [`BlocknotesError::InvalidSnapshot`] for duplicate page or block
    /// ids and for block payloads that do not fit their block type, and
    /// [`BlocknotesError::CyclicHierarchy`] if any parent chain loops.
    pub fn validate(&self) -> Result<()> {
        let mut page_ids = HashSet::new();
        for page in &self.pages {
            if !page_ids.insert(page.id.as_str()) {
                return Err(BlocknotesError::InvalidSnapshot(format!(
                    "duplicate page id {}",
                    page.id
                )));
            }
            page.validate().map_err(|e| {
                BlocknotesError::InvalidSnapshot(format!("page {}: {e}", page.id))
            })?;
        }

        let index = self.index();
        for page in &self.pages {
            index.ancestors_of(&page.id)?;
        }
        Ok(())
    }

    /// Validates this state and repairs the weak pointers into it.
    ///
    /// Page blocks missing their reference payload get the unlinked
    /// placeholder, the current page is cleared if it is missing or trashed, and
    /// trash selections that are not in the trash are dropped.
    pub(crate) fn normalize(&mut self) -> Result<()> {
        self.validate()?;

        for page in &mut self.pages {
            let repaired = page.link_placeholders();
            if repaired > 0 {
                log::warn!("{repaired} page block(s) on page {} had no reference; unlinking", page.id);
            }
        }

        if let Some(current) = self.current_page_id.as_deref() {
            if !self.page(current).is_some_and(|p| !p.is_deleted) {
                log::warn!("current page {current} is not accessible; clearing");
                self.current_page_id = None;
            }
        }

        let trashed: HashSet<String> = self
            .pages
            .iter()
            .filter(|p| p.is_deleted)
            .map(|p| p.id.clone())
            .collect();
        self.selected_trash_page_ids.retain(|id| trashed.contains(id));
        Ok(())
    }
}
