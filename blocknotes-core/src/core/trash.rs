//! Soft-delete, restore and purge of pages.
//!
//! A page moves `active → deleted` when it is sent to the trash and back via
//! restore; purging removes its record for good. The two cascades differ,
//! and both are governed by [`TrashPolicy`]:
//!
//! - Sending a folder to the trash also trashes every descendant
//!   (`cascade_on_soft_delete`, on by default). A plain page goes alone; its
//!   active children are then listed at the top level.
//! - Purging removes only the named pages (`cascade_on_purge`, off by
//!   default); their children survive as records whose parent is gone.
//!
//! Restoring always walks *up*: the page and each trashed ancestor come back,
//! so the restored page is reachable from the top of the tree. Descendants
//! stay where they are.
//!
//! ## Serialization
//!
//! `TrashPolicy` fields serialize in camelCase (`cascadeOnSoftDelete`,
//! `cascadeOnPurge`), as part of the store settings file.
//!
//! ```rust
//! use blocknotes_core::TrashPolicy;
//!
//! let policy = TrashPolicy::default();
//! assert!(policy.cascade_on_soft_delete);
//! assert!(!policy.cascade_on_purge);
//!
//! let json = serde_json::to_string(&policy).unwrap();
//! assert_eq!(json, r#"{"cascadeOnSoftDelete":true,"cascadeOnPurge":false}"#);
//! ```

use crate::core::block::PageId;
use crate::core::page::Page;
use crate::core::state::DocumentState;
use crate::{BlocknotesError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Controls which relatives follow a page into the trash or out of existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrashPolicy {
    /// Trash every descendant along with a target folder.
    pub cascade_on_soft_delete: bool,

    /// Purge every descendant along with the target page.
    pub cascade_on_purge: bool,
}

impl Default for TrashPolicy {
    fn default() -> Self {
        Self {
            cascade_on_soft_delete: true,
            cascade_on_purge: false,
        }
    }
}

impl DocumentState {
    /// Pages currently in the trash.
    #[must_use]
    pub fn trash_pages(&self) -> Vec<&Page> {
        self.pages.iter().filter(|p| p.is_deleted).collect()
    }

    /// Sends `page_id` to the trash. A folder takes its descendants with it
    /// when `policy` cascades.
    ///
    /// Clears the current page if it was trashed and drops the trash selection.
    /// Returns every id that is now in the deleted set because of this call.
    pub(crate) fn delete_page(&mut self, page_id: &str, policy: &TrashPolicy) -> Result<Vec<PageId>> {
        let is_folder = self.require_page(page_id)?.is_folder;

        let mut targets = vec![page_id.to_string()];
        if is_folder && policy.cascade_on_soft_delete {
            let index = self.index();
            targets.extend(index.descendants_of(page_id).into_iter().map(str::to_string));
        }
        let targets_set: HashSet<&str> = targets.iter().map(String::as_str).collect();

        for page in &mut self.pages {
            if targets_set.contains(page.id.as_str()) {
                page.is_deleted = true;
            }
        }
        if self
            .current_page_id
            .as_deref()
            .is_some_and(|id| targets_set.contains(id))
        {
            self.current_page_id = None;
        }
        self.selected_trash_page_ids.clear();

        log::info!("moved {} page(s) to the trash", targets.len());
        Ok(targets)
    }

    /// Restores `page_id` together with every trashed ancestor.
    ///
    /// Returns the ids whose state changed.
    pub(crate) fn restore_page(&mut self, page_id: &str) -> Result<Vec<PageId>> {
        self.require_page(page_id)?;
        let restored = self.restore_chain(page_id);
        log::info!("restored {} page(s) from the trash", restored.len());
        Ok(restored)
    }

    /// Restores each trashed page in `page_ids` with the same upward cascade
    /// as [`Self::restore_page`]. Ids that are not in the trash are skipped.
    pub(crate) fn restore_pages(&mut self, page_ids: &[PageId]) -> Result<Vec<PageId>> {
        let trashed: Vec<PageId> = page_ids
            .iter()
            .filter(|id| self.page(id).is_some_and(|p| p.is_deleted))
            .cloned()
            .collect();
        if trashed.is_empty() {
            return Err(BlocknotesError::PageNotFound(page_ids.join(", ")));
        }

        let mut restored = Vec::new();
        for id in &trashed {
            restored.extend(self.restore_chain(id));
        }
        log::info!("restored {} page(s) from the trash", restored.len());
        Ok(restored)
    }

    /// Restores every trashed page and clears the selection.
    pub(crate) fn restore_all_trash(&mut self) -> Result<Vec<PageId>> {
        let mut restored = Vec::new();
        for page in self.pages.iter_mut().filter(|p| p.is_deleted) {
            page.is_deleted = false;
            restored.push(page.id.clone());
        }
        self.selected_trash_page_ids.clear();
        log::info!("restored all {} trashed page(s)", restored.len());
        Ok(restored)
    }

    /// Permanently removes the pages in `page_ids` (and, per `policy`, their
    /// descendants). Unknown ids are skipped; at least one must exist.
    ///
    /// Purged ids are scrubbed from the selection and favorites, and the
    /// current page is cleared if it was removed. Returns the purged ids.
    pub(crate) fn purge_pages(&mut self, page_ids: &[PageId], policy: &TrashPolicy) -> Result<Vec<PageId>> {
        let existing: Vec<PageId> = page_ids
            .iter()
            .filter(|id| self.contains_page(id))
            .cloned()
            .collect();
        if existing.is_empty() {
            return Err(BlocknotesError::PageNotFound(page_ids.join(", ")));
        }
        Ok(self.remove_pages(existing, policy))
    }

    /// Permanently removes every trashed page and clears the selection.
    pub(crate) fn purge_all_trash(&mut self, policy: &TrashPolicy) -> Result<Vec<PageId>> {
        let trashed: Vec<PageId> = self.trash_pages().iter().map(|p| p.id.clone()).collect();
        let purged = self.remove_pages(trashed, policy);
        self.selected_trash_page_ids.clear();
        Ok(purged)
    }

    /// Toggles `page_id` in the trash selection. Only trashed pages can be selected.
    pub(crate) fn toggle_trash_selection(&mut self, page_id: &str) -> Result<()> {
        if !self.require_page(page_id)?.is_deleted {
            return Err(BlocknotesError::InvalidState(format!(
                "page {page_id} is not in the trash"
            )));
        }
        if let Some(pos) = self.selected_trash_page_ids.iter().position(|id| id == page_id) {
            self.selected_trash_page_ids.remove(pos);
        } else {
            self.selected_trash_page_ids.push(page_id.to_string());
        }
        Ok(())
    }

    /// Selects every trashed page, or clears the selection.
    pub(crate) fn select_all_trash(&mut self, select: bool) {
        let selection: Vec<PageId> = if select {
            self.pages
                .iter()
                .filter(|p| p.is_deleted)
                .map(|p| p.id.clone())
                .collect()
        } else {
            Vec::new()
        };
        self.selected_trash_page_ids = selection;
    }

    /// Marks `page_id` and its trashed ancestors active; returns those that changed.
    fn restore_chain(&mut self, page_id: &str) -> Vec<PageId> {
        let mut chain = vec![page_id.to_string()];
        {
            let index = self.index();
            let mut seen: HashSet<&str> = HashSet::from([page_id]);
            let mut current = page_id;
            while let Some(parent) = index.parent_of(current) {
                if !seen.insert(parent) {
                    log::warn!("cycle above page {page_id}; stopping restore walk");
                    break;
                }
                if index.is_deleted(parent) {
                    chain.push(parent.to_string());
                }
                current = parent;
            }
        }

        let mut restored = Vec::new();
        for id in &chain {
            if let Some(page) = self.page_mut(id) {
                if page.is_deleted {
                    page.is_deleted = false;
                    restored.push(id.clone());
                }
            }
        }
        self.selected_trash_page_ids.retain(|id| !chain.contains(id));
        restored
    }

    fn remove_pages(&mut self, mut targets: Vec<PageId>, policy: &TrashPolicy) -> Vec<PageId> {
        if policy.cascade_on_purge {
            let index = self.index();
            let descendants: Vec<PageId> = targets
                .iter()
                .flat_map(|id| index.descendants_of(id))
                .map(str::to_string)
                .collect();
            targets.extend(descendants);
        }
        let doomed: HashSet<PageId> = targets.into_iter().collect();

        self.pages.retain(|p| !doomed.contains(&p.id));
        self.selected_trash_page_ids.retain(|id| !doomed.contains(id));
        self.favorites.retain(|id| !doomed.contains(id));
        if self
            .current_page_id
            .as_ref()
            .is_some_and(|id| doomed.contains(id))
        {
            self.current_page_id = None;
        }

        log::info!("permanently deleted {} page(s)", doomed.len());
        doomed.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, StoreConfig};

    fn page(id: &str, parent: Option<&str>) -> Page {
        let mut page = Page::new(id, "", parent.map(str::to_string));
        page.id = id.to_string();
        page
    }

    /// F (folder) → D1 → D2, plus an unrelated top-level sibling S.
    fn tree() -> DocumentState {
        let mut folder = page("f", None);
        folder.is_folder = true;
        DocumentState {
            pages: vec![folder, page("d1", Some("f")), page("d2", Some("d1")), page("s", None)],
            current_page_id: Some("d2".to_string()),
            ..DocumentState::default()
        }
    }

    fn deleted(state: &DocumentState, id: &str) -> bool {
        state.page(id).unwrap().is_deleted
    }

    fn run(state: &DocumentState, command: Command) -> DocumentState {
        state.apply(&command, &StoreConfig::default())
    }

    #[test]
    fn test_delete_cascades_to_descendants() {
        let state = run(&tree(), Command::DeletePage("f".to_string()));

        assert!(deleted(&state, "f"));
        assert!(deleted(&state, "d1"));
        assert!(deleted(&state, "d2"));
        assert!(!deleted(&state, "s"));
        assert!(state.current_page_id.is_none());
        assert_eq!(state.trash_pages().len(), 3);
    }

    #[test]
    fn test_delete_plain_page_leaves_children_active() {
        let state = run(&tree(), Command::DeletePage("d1".to_string()));

        assert!(deleted(&state, "d1"));
        assert!(!deleted(&state, "d2"));
        assert!(!deleted(&state, "f"));
        assert_eq!(state.current_page_id.as_deref(), Some("d2"));

        let top: Vec<&str> = state.top_level_pages().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(top, vec!["f", "d2", "s"]);
    }

    #[test]
    fn test_delete_without_cascade() {
        let mut state = tree();
        let policy = TrashPolicy {
            cascade_on_soft_delete: false,
            ..TrashPolicy::default()
        };
        state.delete_page("f", &policy).unwrap();

        assert!(deleted(&state, "f"));
        assert!(!deleted(&state, "d1"));
        assert_eq!(state.current_page_id.as_deref(), Some("d2"));
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut state = run(&tree(), Command::DeletePage("s".to_string()));
        state.selected_trash_page_ids = vec!["s".to_string()];

        let state = run(&state, Command::DeletePage("d2".to_string()));
        assert!(state.selected_trash_page_ids.is_empty());
    }

    #[test]
    fn test_restore_cascades_upward_only() {
        let state = run(&tree(), Command::DeletePage("f".to_string()));
        let state = run(&state, Command::DeletePage("s".to_string()));

        let state = run(&state, Command::RestorePage("d2".to_string()));

        assert!(!deleted(&state, "d2"));
        assert!(!deleted(&state, "d1"));
        assert!(!deleted(&state, "f"));
        assert!(deleted(&state, "s"));
    }

    #[test]
    fn test_restore_does_not_resurrect_children() {
        let state = run(&tree(), Command::DeletePage("f".to_string()));
        let state = run(&state, Command::RestorePage("f".to_string()));

        assert!(!deleted(&state, "f"));
        assert!(deleted(&state, "d1"));
        assert!(deleted(&state, "d2"));
    }

    #[test]
    fn test_restore_scrubs_selection() {
        let mut state = run(&tree(), Command::DeletePage("f".to_string()));
        state.selected_trash_page_ids = vec!["d1".to_string(), "f".to_string(), "d2".to_string()];

        let state = run(&state, Command::RestorePage("d1".to_string()));
        assert_eq!(state.selected_trash_page_ids, vec!["d2".to_string()]);
    }

    #[test]
    fn test_restore_selected_skips_active_pages() {
        let state = run(&tree(), Command::DeletePage("d2".to_string()));
        let state = run(
            &state,
            Command::RestoreSelectedTrash(vec!["d2".to_string(), "s".to_string()]),
        );
        assert!(state.trash_pages().is_empty());

        let unchanged = run(&state, Command::RestoreSelectedTrash(vec!["s".to_string()]));
        assert_eq!(unchanged, state);
    }

    #[test]
    fn test_restore_all() {
        let state = run(&tree(), Command::DeletePage("f".to_string()));
        let state = run(&state, Command::SelectAllTrashPages(true));
        assert_eq!(state.selected_trash_page_ids.len(), 3);

        let state = run(&state, Command::RestoreAllTrash);
        assert!(state.trash_pages().is_empty());
        assert!(state.selected_trash_page_ids.is_empty());
    }

    #[test]
    fn test_selection_is_scoped_to_trash() {
        let state = run(&tree(), Command::DeletePage("s".to_string()));

        let selected = run(&state, Command::TogglePageSelectionInTrash("s".to_string()));
        assert_eq!(selected.selected_trash_page_ids, vec!["s".to_string()]);

        let unchanged = run(&state, Command::TogglePageSelectionInTrash("f".to_string()));
        assert_eq!(unchanged, state);

        let toggled_off = run(&selected, Command::TogglePageSelectionInTrash("s".to_string()));
        assert!(toggled_off.selected_trash_page_ids.is_empty());

        let none = run(&selected, Command::SelectAllTrashPages(false));
        assert!(none.selected_trash_page_ids.is_empty());
    }

    #[test]
    fn test_purge_selected_scrubs_pointers() {
        let mut state = run(&tree(), Command::DeletePage("s".to_string()));
        state.current_page_id = Some("s".to_string());
        state.favorites = vec!["s".to_string(), "f".to_string()];
        state.selected_trash_page_ids = vec!["s".to_string()];

        let state = run(&state, Command::PermanentlyDeleteSelectedTrash(vec!["s".to_string()]));

        assert!(state.page("s").is_none());
        assert!(state.selected_trash_page_ids.is_empty());
        assert!(state.current_page_id.is_none());
        assert_eq!(state.favorites, vec!["f".to_string()]);
    }

    #[test]
    fn test_purge_does_not_cascade_by_default() {
        let state = run(&tree(), Command::DeletePage("f".to_string()));
        let state = run(&state, Command::PermanentlyDeletePage("f".to_string()));

        assert!(state.page("f").is_none());
        let d1 = state.page("d1").unwrap();
        assert!(d1.is_deleted);
        assert_eq!(d1.parent_id.as_deref(), Some("f"));
        state.validate().unwrap();
    }

    #[test]
    fn test_purge_with_cascade() {
        let mut state = run(&tree(), Command::DeletePage("f".to_string()));
        let policy = TrashPolicy {
            cascade_on_purge: true,
            ..TrashPolicy::default()
        };
        let mut purged = state.purge_pages(&["f".to_string()], &policy).unwrap();
        purged.sort();

        assert_eq!(purged, vec!["d1", "d2", "f"]);
        assert_eq!(state.pages.len(), 1);
    }

    #[test]
    fn test_purge_all_trash() {
        let mut state = run(&tree(), Command::DeletePage("d1".to_string()));
        state.current_page_id = Some("s".to_string());
        let state = run(&state, Command::SelectAllTrashPages(true));

        let state = run(&state, Command::PermanentlyDeleteAllTrash);

        let remaining: Vec<&str> = state.pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(remaining, vec!["f", "d2", "s"]);
        assert!(state.selected_trash_page_ids.is_empty());
        assert_eq!(state.current_page_id.as_deref(), Some("s"));
    }

    #[test]
    fn test_restored_orphan_is_reachable() {
        let state = run(&tree(), Command::DeletePage("f".to_string()));
        let state = run(&state, Command::PermanentlyDeletePage("f".to_string()));
        let state = run(&state, Command::RestorePage("d2".to_string()));

        assert!(!deleted(&state, "d1"));
        let top: Vec<&str> = state.top_level_pages().iter().map(|p| p.id.as_str()).collect();
        assert!(top.contains(&"d1"));
    }
}
