//! Page-tree operations and the read-only views derived from the tree.

use crate::core::block::{Block, PageId};
use crate::core::page::Page;
use crate::core::state::{DocumentState, View};
use crate::{BlocknotesError, Result};
use chrono::Utc;
use uuid::Uuid;

/// What a `page` block's reference currently points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageReference<'a> {
    /// The block is not a page reference, or still holds the placeholder.
    Unlinked,
    /// The target exists and is active.
    Resolved(&'a Page),
    /// The target exists but sits in the trash.
    Trashed(&'a Page),
    /// The target id no longer resolves to any page.
    Missing,
}

impl DocumentState {
    /// Inserts a fully-formed page.
    ///
    /// Page blocks without a payload get the unlinked placeholder. Rejects a
    /// duplicate id, a page that fails [`Page::validate`], and a `parent_id`
    /// that would close a cycle with existing records pointing at the new
    /// page's id.
    pub(crate) fn add_page(&mut self, mut page: Page) -> Result<()> {
        page.link_placeholders();
        page.validate()?;
        if self.contains_page(&page.id) {
            return Err(BlocknotesError::InvalidState(format!(
                "page {} already exists",
                page.id
            )));
        }
        if let Some(parent_id) = page.parent_id.as_deref() {
            self.check_reparent(&page.id, parent_id)?;
        }
        log::debug!("adding page {} ({})", page.id, page.title);
        self.pages.push(page);
        Ok(())
    }

    /// Copies a page under a fresh id, next to the original.
    ///
    /// Every block is copied with a fresh id; page-reference blocks keep their
    /// target. Returns the id of the copy.
    pub(crate) fn duplicate_page(&mut self, page_id: &str, suffix: &str) -> Result<PageId> {
        let source = self.require_page(page_id)?;
        let now = Utc::now();
        let copy = Page {
            id: Uuid::new_v4().to_string(),
            title: format!("{} {suffix}", source.title),
            content: source.content.iter().map(Block::duplicate).collect(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
            ..source.clone()
        };
        let copy_id = copy.id.clone();
        log::debug!("duplicated page {page_id} as {copy_id}");
        self.pages.push(copy);
        Ok(copy_id)
    }

    /// Fails if making `new_parent_id` the parent of `page_id` would make
    /// `page_id` its own ancestor.
    pub(crate) fn check_reparent(&self, page_id: &str, new_parent_id: &str) -> Result<()> {
        if page_id == new_parent_id {
            return Err(BlocknotesError::InvalidMove(
                "A page cannot be its own parent".to_string(),
            ));
        }
        if self.index().is_descendant(new_parent_id, page_id) {
            return Err(BlocknotesError::InvalidMove(
                "Cannot move a page into its own descendant".to_string(),
            ));
        }
        Ok(())
    }

    /// Reassigns the parent of `page_id`; `None` moves it to the top level.
    ///
    /// The new parent must exist and must not be the page itself or one of its
    /// descendants.
    pub(crate) fn update_page_parent(&mut self, page_id: &str, new_parent_id: Option<&str>) -> Result<()> {
        self.require_page(page_id)?;
        if let Some(parent_id) = new_parent_id {
            self.require_page(parent_id)?;
            self.check_reparent(page_id, parent_id)?;
        }
        let page = self.require_page_mut(page_id)?;
        page.parent_id = new_parent_id.map(str::to_string);
        Ok(())
    }

    /// Sets the title. Any string is accepted; validation is the caller's.
    pub(crate) fn update_page_title(&mut self, page_id: &str, title: &str) -> Result<()> {
        let page = self.require_page_mut(page_id)?;
        page.title = title.to_string();
        page.touch();
        Ok(())
    }

    pub(crate) fn toggle_favorite(&mut self, page_id: &str) -> Result<()> {
        self.require_page(page_id)?;
        if let Some(pos) = self.favorites.iter().position(|id| id == page_id) {
            self.favorites.remove(pos);
        } else {
            self.favorites.push(page_id.to_string());
        }
        Ok(())
    }

    /// Focuses `page_id`, which must be an active page. `None` clears the focus.
    pub(crate) fn set_current_page(&mut self, page_id: Option<&str>) -> Result<()> {
        if let Some(id) = page_id {
            if self.require_page(id)?.is_deleted {
                return Err(BlocknotesError::InvalidState(format!("page {id} is in the trash")));
            }
        }
        self.current_page_id = page_id.map(str::to_string);
        Ok(())
    }

    /// Switches view; any pending trash selection is dropped.
    pub(crate) fn set_current_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_trash_page_ids.clear();
    }

    // ── queries ──────────────────────────────────────────────────

    /// Returns `true` if `ancestor_id` is in the parent chain of `page_id`.
    ///
    /// This is the check drag-and-drop callers use before proposing a move.
    #[must_use]
    pub fn is_descendant(&self, page_id: &str, ancestor_id: &str) -> bool {
        self.index().is_descendant(page_id, ancestor_id)
    }

    #[must_use]
    pub fn current_page(&self) -> Option<&Page> {
        self.current_page_id.as_deref().and_then(|id| self.page(id))
    }

    /// The path from the top of the tree down to `page_id`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`BlocknotesError::PageNotFound`] for an unknown page and
    /// [`BlocknotesError::CyclicHierarchy`] if the parent chain loops.
    pub fn breadcrumbs(&self, page_id: &str) -> Result<Vec<&Page>> {
        let ancestors = self.index().ancestors_of(page_id)?;
        let mut path: Vec<&Page> = ancestors.iter().rev().filter_map(|id| self.page(id)).collect();
        path.push(self.require_page(page_id)?);
        Ok(path)
    }

    /// Active pages shown at the top of the sidebar.
    ///
    /// A page whose parent is missing or trashed is listed here so that every
    /// active page stays reachable.
    #[must_use]
    pub fn top_level_pages(&self) -> Vec<&Page> {
        let index = self.index();
        self.pages
            .iter()
            .filter(|p| !p.is_deleted)
            .filter(|p| match index.parent_of(&p.id) {
                None => true,
                Some(parent) => index.is_deleted(parent),
            })
            .collect()
    }

    /// Active direct children of `page_id`.
    #[must_use]
    pub fn child_pages(&self, page_id: &str) -> Vec<&Page> {
        self.pages
            .iter()
            .filter(|p| !p.is_deleted && p.parent_id.as_deref() == Some(page_id))
            .collect()
    }

    #[must_use]
    pub fn child_count(&self, page_id: &str) -> usize {
        self.child_pages(page_id).len()
    }

    /// Number of pages, active or trashed, below `page_id`.
    #[must_use]
    pub fn descendant_count(&self, page_id: &str) -> usize {
        self.index().descendants_of(page_id).len()
    }

    /// Active favorited pages in the order they were favorited.
    #[must_use]
    pub fn favorite_pages(&self) -> Vec<&Page> {
        self.favorites
            .iter()
            .filter_map(|id| self.page(id))
            .filter(|p| !p.is_deleted)
            .collect()
    }

    #[must_use]
    pub fn is_favorite(&self, page_id: &str) -> bool {
        self.index().is_favorite(page_id)
    }

    /// Active pages whose title or block content contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Page> {
        self.pages
            .iter()
            .filter(|p| !p.is_deleted && p.matches(query))
            .collect()
    }

    /// Classifies where a `page` block's reference points.
    #[must_use]
    pub fn resolve_page_reference(&self, block: &Block) -> PageReference<'_> {
        let Some(target) = block.referenced_page_id() else {
            return PageReference::Unlinked;
        };
        match self.page(target) {
            Some(page) if page.is_deleted => PageReference::Trashed(page),
            Some(page) => PageReference::Resolved(page),
            None => PageReference::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockData, BlockType, Command, StoreConfig};
    use proptest::prelude::*;

    fn page(id: &str, parent: Option<&str>) -> Page {
        let mut page = Page::new(id.to_uppercase(), "", parent.map(str::to_string));
        page.id = id.to_string();
        page
    }

    fn tree() -> DocumentState {
        let mut folder = page("f", None);
        folder.is_folder = true;
        DocumentState {
            pages: vec![folder, page("d1", Some("f")), page("d2", Some("d1")), page("s", None)],
            ..DocumentState::default()
        }
    }

    fn config() -> StoreConfig {
        StoreConfig::default()
    }

    #[test]
    fn test_add_page() {
        let mut state = tree();
        state.add_page(page("new", Some("f"))).unwrap();
        assert_eq!(state.child_count("f"), 2);
    }

    #[test]
    fn test_add_page_rejects_duplicate_id() {
        let mut state = tree();
        assert!(matches!(
            state.add_page(page("s", None)),
            Err(BlocknotesError::InvalidState(_))
        ));
    }

    #[test]
    fn test_add_page_rejects_invalid_blocks() {
        let state = tree();
        let mut bad = page("bad", None);
        bad.content[0].data = Some(BlockData::empty_page_ref());

        let result = state.try_apply(&Command::AddPage(Box::new(bad)), &config());
        assert!(matches!(result, Err(BlocknotesError::InvalidBlockData(_))));
    }

    #[test]
    fn test_added_pages_survive_export_and_import() {
        let state = tree();
        let mut linked = page("linked", None);
        let mut unlinked = Block::new(BlockType::Page);
        unlinked.data = None;
        linked.content.push(unlinked);

        let next = state
            .try_apply(&Command::AddPage(Box::new(linked)), &config())
            .unwrap();
        assert_eq!(
            next.page("linked").unwrap().content[1].data,
            Some(BlockData::empty_page_ref())
        );

        let json = crate::export_state(&next).unwrap();
        assert_eq!(crate::import_state(&json).unwrap(), next);
    }

    #[test]
    fn test_add_page_rejects_cycle_through_orphans() {
        let mut state = tree();
        state.pages.push(page("orphan", Some("ghost")));

        let result = state.add_page(page("ghost", Some("orphan")));
        assert!(matches!(result, Err(BlocknotesError::InvalidMove(_))));
    }

    #[test]
    fn test_duplicate_page_copies_blocks_with_fresh_ids() {
        let mut state = tree();
        let d1 = state.page_mut("d1").unwrap();
        d1.content = vec![
            Block::with_content(BlockType::Heading1, "Title"),
            Block::page_reference("d2"),
        ];
        let original = state.page("d1").unwrap().clone();

        let copy_id = state.duplicate_page("d1", "(Copy)").unwrap();
        let copy = state.page(&copy_id).unwrap();

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.title, "D1 (Copy)");
        assert_eq!(copy.parent_id.as_deref(), Some("f"));
        assert_eq!(copy.content.len(), original.content.len());
        for (new, old) in copy.content.iter().zip(&original.content) {
            assert!(original.content.iter().all(|b| b.id != new.id));
            assert_eq!(new.block_type, old.block_type);
            assert_eq!(new.content, old.content);
        }
        assert_eq!(copy.content[1].referenced_page_id(), Some("d2"));
        assert!(state.page("d2").is_some());
        assert_eq!(state.pages.len(), 5);
    }

    #[test]
    fn test_update_page_parent() {
        let mut state = tree();
        state.update_page_parent("s", Some("d2")).unwrap();
        assert!(state.is_descendant("s", "f"));

        state.update_page_parent("s", None).unwrap();
        assert!(state.page("s").unwrap().parent_id.is_none());
    }

    #[test]
    fn test_update_page_parent_prevents_cycle() {
        let mut state = tree();
        let err = state.update_page_parent("f", Some("d2")).unwrap_err();
        assert!(err.to_string().contains("descendant"), "Expected cycle error, got: {err}");

        assert!(state.update_page_parent("f", Some("f")).is_err());
        assert!(state.update_page_parent("f", Some("missing")).is_err());
    }

    #[test]
    fn test_update_page_title_refreshes_timestamp() {
        let mut state = tree();
        let before = state.page("s").unwrap().updated_at;
        state.update_page_title("s", "").unwrap();
        let page = state.page("s").unwrap();
        assert_eq!(page.title, "");
        assert!(page.updated_at >= before);
    }

    #[test]
    fn test_toggle_favorite_is_symmetric() {
        let state = tree();
        let once = state.apply(&Command::ToggleFavorite("s".to_string()), &config());
        assert!(once.is_favorite("s"));
        assert_eq!(once.favorite_pages().len(), 1);

        let twice = once.apply(&Command::ToggleFavorite("s".to_string()), &config());
        assert!(!twice.is_favorite("s"));
        assert_eq!(twice, state);
    }

    #[test]
    fn test_set_current_page_requires_active_page() {
        let mut state = tree();
        state.set_current_page(Some("d1")).unwrap();
        assert_eq!(state.current_page().unwrap().id, "d1");

        state.page_mut("s").unwrap().is_deleted = true;
        assert!(state.set_current_page(Some("s")).is_err());
        assert_eq!(state.current_page_id.as_deref(), Some("d1"));

        state.set_current_page(None).unwrap();
        assert!(state.current_page().is_none());
    }

    #[test]
    fn test_set_current_view_clears_selection() {
        let mut state = tree();
        state.selected_trash_page_ids = vec!["s".to_string()];
        state.set_current_view(View::Pages);
        assert!(state.selected_trash_page_ids.is_empty());
        assert_eq!(state.current_view, View::Pages);
    }

    #[test]
    fn test_breadcrumbs() {
        let state = tree();
        let path: Vec<&str> = state.breadcrumbs("d2").unwrap().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(path, vec!["f", "d1", "d2"]);
        assert!(state.breadcrumbs("missing").is_err());
    }

    #[test]
    fn test_breadcrumbs_report_cycle() {
        let mut state = tree();
        state.page_mut("f").unwrap().parent_id = Some("d2".to_string());
        assert!(matches!(state.breadcrumbs("d1"), Err(BlocknotesError::CyclicHierarchy(_))));
    }

    #[test]
    fn test_top_level_includes_orphans() {
        let mut state = tree();
        state.pages.push(page("orphan", Some("purged")));
        state.page_mut("s").unwrap().is_deleted = true;

        let top: Vec<&str> = state.top_level_pages().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(top, vec!["f", "orphan"]);
    }

    #[test]
    fn test_children_and_counts() {
        let state = tree();
        assert_eq!(state.child_count("f"), 1);
        assert_eq!(state.descendant_count("f"), 2);
        assert_eq!(state.child_pages("d1")[0].id, "d2");
    }

    #[test]
    fn test_search_skips_trash() {
        let mut state = tree();
        state.page_mut("d1").unwrap().content[0].content = "quarterly roadmap".to_string();
        assert_eq!(state.search("ROADMAP").len(), 1);

        state.page_mut("d1").unwrap().is_deleted = true;
        assert!(state.search("roadmap").is_empty());
    }

    #[test]
    fn test_resolve_page_reference() {
        let mut state = tree();
        state.page_mut("d2").unwrap().is_deleted = true;

        assert!(matches!(
            state.resolve_page_reference(&Block::page_reference("d1")),
            PageReference::Resolved(p) if p.id == "d1"
        ));
        assert!(matches!(
            state.resolve_page_reference(&Block::page_reference("d2")),
            PageReference::Trashed(_)
        ));
        assert_eq!(
            state.resolve_page_reference(&Block::page_reference("gone")),
            PageReference::Missing
        );
        assert_eq!(
            state.resolve_page_reference(&Block::new(BlockType::Page)),
            PageReference::Unlinked
        );
    }

    fn ids() -> impl Strategy<Value = usize> {
        0usize..6
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn reparenting_never_creates_a_cycle(
            moves in proptest::collection::vec((ids(), proptest::option::of(ids())), 0..40)
        ) {
            let names = ["a", "b", "c", "d", "e", "f"];
            let mut state = DocumentState {
                pages: names.iter().map(|n| page(n, None)).collect(),
                ..DocumentState::default()
            };

            for (child, parent) in moves {
                let cmd = Command::UpdatePageParent {
                    page_id: names[child].to_string(),
                    new_parent_id: parent.map(|p| names[p].to_string()),
                };
                state = state.apply(&cmd, &StoreConfig::default());
                prop_assert!(state.validate().is_ok());
            }
        }
    }
}
