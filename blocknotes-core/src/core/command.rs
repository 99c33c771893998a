//! Commands accepted by the document store.

use crate::core::block::{BlockId, BlockType, BlockUpdate, PageId};
use crate::core::page::Page;
use crate::core::state::{DocumentState, View};
use serde::{Deserialize, Serialize};

/// A single intent dispatched against a [`DocumentState`].
///
/// Commands serialize as `{"type": "ADD_BLOCK", "payload": {...}}`, the same
/// action shape the editor front-end dispatches, so a host can forward them
/// from a JSON bridge without a mapping layer.
///
/// # Examples
///
/// ```rust
/// use blocknotes_core::{BlockType, Command};
///
/// let cmd = Command::AddBlock {
///     page_id: "p1".to_string(),
///     after_block_id: None,
///     block_type: BlockType::Quote,
/// };
/// let json = serde_json::to_string(&cmd).unwrap();
/// assert_eq!(json, r#"{"type":"ADD_BLOCK","payload":{"pageId":"p1","afterBlockId":null,"type":"quote"}}"#);
///
/// let parsed: Command = serde_json::from_str(r#"{"type":"DELETE_PAGE","payload":"p1"}"#).unwrap();
/// assert_eq!(parsed, Command::DeletePage("p1".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    /// Replace the whole state, e.g. after loading it from storage.
    InitializeState(Box<DocumentState>),
    /// Insert a fully-formed page.
    AddPage(Box<Page>),
    /// Focus a page, or clear the focus with `None`.
    SetCurrentPage(Option<PageId>),
    /// Switch between the pages, trash and settings views.
    SetCurrentView(View),
    ToggleFavorite(PageId),
    /// Move a page (and its descendants) to the trash.
    DeletePage(PageId),
    /// Bring a page (and its deleted ancestors) back from the trash.
    RestorePage(PageId),
    DuplicatePage(PageId),
    ReorderBlocks {
        page_id: PageId,
        from_index: usize,
        to_index: usize,
    },
    UpdateBlock {
        page_id: PageId,
        block_id: BlockId,
        updates: BlockUpdate,
    },
    AddBlock {
        page_id: PageId,
        after_block_id: Option<BlockId>,
        #[serde(rename = "type")]
        block_type: BlockType,
    },
    DeleteBlock {
        page_id: PageId,
        block_id: BlockId,
    },
    ConvertBlockInline {
        page_id: PageId,
        block_id: BlockId,
        #[serde(rename = "type")]
        block_type: BlockType,
        keep_content: bool,
    },
    AddListItem {
        page_id: PageId,
        block_id: BlockId,
        indent: bool,
    },
    /// Turn an existing block into a link to `reference_page_id`.
    AddPageReference {
        page_id: PageId,
        block_id: BlockId,
        reference_page_id: PageId,
    },
    /// Append a new link block to the end of `parent_page_id`.
    AddPageReferenceToParent {
        parent_page_id: PageId,
        reference_page_id: PageId,
    },
    UpdatePageParent {
        page_id: PageId,
        new_parent_id: Option<PageId>,
    },
    UpdatePageTitle {
        page_id: PageId,
        new_title: String,
    },
    #[serde(rename = "TOGGLE_SELECT_TRASH_PAGE")]
    TogglePageSelectionInTrash(PageId),
    SelectAllTrashPages(bool),
    PermanentlyDeletePage(PageId),
    PermanentlyDeleteSelectedTrash(Vec<PageId>),
    PermanentlyDeleteAllTrash,
    RestoreSelectedTrash(Vec<PageId>),
    RestoreAllTrash,
}

impl Command {
    /// Returns the wire name of this command, used in log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializeState(_) => "INITIALIZE_STATE",
            Self::AddPage(_) => "ADD_PAGE",
            Self::SetCurrentPage(_) => "SET_CURRENT_PAGE",
            Self::SetCurrentView(_) => "SET_CURRENT_VIEW",
            Self::ToggleFavorite(_) => "TOGGLE_FAVORITE",
            Self::DeletePage(_) => "DELETE_PAGE",
            Self::RestorePage(_) => "RESTORE_PAGE",
            Self::DuplicatePage(_) => "DUPLICATE_PAGE",
            Self::ReorderBlocks { .. } => "REORDER_BLOCKS",
            Self::UpdateBlock { .. } => "UPDATE_BLOCK",
            Self::AddBlock { .. } => "ADD_BLOCK",
            Self::DeleteBlock { .. } => "DELETE_BLOCK",
            Self::ConvertBlockInline { .. } => "CONVERT_BLOCK_INLINE",
            Self::AddListItem { .. } => "ADD_LIST_ITEM",
            Self::AddPageReference { .. } => "ADD_PAGE_REFERENCE",
            Self::AddPageReferenceToParent { .. } => "ADD_PAGE_REFERENCE_TO_PARENT",
            Self::UpdatePageParent { .. } => "UPDATE_PAGE_PARENT",
            Self::UpdatePageTitle { .. } => "UPDATE_PAGE_TITLE",
            Self::TogglePageSelectionInTrash(_) => "TOGGLE_SELECT_TRASH_PAGE",
            Self::SelectAllTrashPages(_) => "SELECT_ALL_TRASH_PAGES",
            Self::PermanentlyDeletePage(_) => "PERMANENTLY_DELETE_PAGE",
            Self::PermanentlyDeleteSelectedTrash(_) => "PERMANENTLY_DELETE_SELECTED_TRASH",
            Self::PermanentlyDeleteAllTrash => "PERMANENTLY_DELETE_ALL_TRASH",
            Self::RestoreSelectedTrash(_) => "RESTORE_SELECTED_TRASH",
            Self::RestoreAllTrash => "RESTORE_ALL_TRASH",
        }
    }
}
