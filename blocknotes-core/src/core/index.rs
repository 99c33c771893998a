//! Derived relationships over a [`DocumentState`] snapshot.
//!
//! The index is rebuilt on demand and never stored; it borrows the snapshot it
//! was built from. Every walk carries a visited set, so a corrupt hierarchy
//! (a parent cycle imported from outside) terminates instead of looping.

use crate::core::state::DocumentState;
use crate::{BlocknotesError, Result};
use std::collections::{HashMap, HashSet, VecDeque};

/// Parent→children, favorite and trash relationships of one snapshot.
pub struct ReferenceIndex<'a> {
    parents: HashMap<&'a str, Option<&'a str>>,
    children: HashMap<&'a str, Vec<&'a str>>,
    favorites: HashSet<&'a str>,
    deleted: HashSet<&'a str>,
}

impl<'a> ReferenceIndex<'a> {
    /// Builds the index for `state`. Children keep page insertion order.
    #[must_use]
    pub fn build(state: &'a DocumentState) -> Self {
        let mut parents = HashMap::with_capacity(state.pages.len());
        let mut children: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        let mut deleted = HashSet::new();

        for page in &state.pages {
            parents.insert(page.id.as_str(), page.parent_id.as_deref());
            if let Some(parent_id) = page.parent_id.as_deref() {
                children.entry(parent_id).or_default().push(page.id.as_str());
            }
            if page.is_deleted {
                deleted.insert(page.id.as_str());
            }
        }

        let favorites = state
            .favorites
            .iter()
            .map(String::as_str)
            .filter(|id| parents.contains_key(id))
            .collect();

        Self {
            parents,
            children,
            favorites,
            deleted,
        }
    }

    #[must_use]
    pub fn contains(&self, page_id: &str) -> bool {
        self.parents.contains_key(page_id)
    }

    /// Direct children of `page_id`, trashed ones included.
    #[must_use]
    pub fn children_of(&self, page_id: &str) -> &[&'a str] {
        self.children.get(page_id).map_or(&[], Vec::as_slice)
    }

    /// Favorite status. Dangling favorite ids count as not favorited.
    #[must_use]
    pub fn is_favorite(&self, page_id: &str) -> bool {
        self.favorites.contains(page_id)
    }

    #[must_use]
    pub fn is_deleted(&self, page_id: &str) -> bool {
        self.deleted.contains(page_id)
    }

    /// Returns the parent id of `page_id` only if that parent exists.
    #[must_use]
    pub fn parent_of(&self, page_id: &str) -> Option<&'a str> {
        self.parents
            .get(page_id)
            .copied()
            .flatten()
            .filter(|parent| self.contains(parent))
    }

    /// Every descendant of `page_id` in breadth-first order, excluding `page_id`.
    #[must_use]
    pub fn descendants_of(&self, page_id: &str) -> Vec<&'a str> {
        let mut seen: HashSet<&str> = HashSet::from([page_id]);
        let mut queue: VecDeque<&'a str> = self.children_of(page_id).iter().copied().collect();
        let mut out = Vec::new();

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            queue.extend(self.children_of(id).iter().copied());
        }
        out
    }

    /// The existing ancestors of `page_id`, nearest first.
    ///
    /// The walk stops at a missing (dangling) parent.
    ///
    /// # Errors
    ///
    /// Returns [`BlocknotesError::PageNotFound`] if `page_id` is unknown and
    /// [`BlocknotesError::CyclicHierarchy`] if the parent chain loops.
    pub fn ancestors_of(&self, page_id: &str) -> Result<Vec<&'a str>> {
        if !self.contains(page_id) {
            return Err(BlocknotesError::PageNotFound(page_id.to_string()));
        }

        let mut seen: HashSet<&str> = HashSet::from([page_id]);
        let mut out = Vec::new();
        let mut current = page_id;
        while let Some(parent) = self.parent_of(current) {
            if !seen.insert(parent) {
                return Err(BlocknotesError::CyclicHierarchy(page_id.to_string()));
            }
            out.push(parent);
            current = parent;
        }
        Ok(out)
    }

    /// Returns `true` if `ancestor_id` appears in the parent chain of `page_id`.
    ///
    /// The chain is followed through `parent_id` values even when they dangle,
    /// so a page about to be created under a missing id is already recognised
    /// as the ancestor of any orphan pointing at that id.
    #[must_use]
    pub fn is_descendant(&self, page_id: &str, ancestor_id: &str) -> bool {
        let mut seen: HashSet<&str> = HashSet::from([page_id]);
        let mut current = self.parents.get(page_id).copied().flatten();
        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.parents.get(id).copied().flatten();
        }
        false
    }
}
