//! The owned store handle that hosts dispatch commands through.

use crate::core::block::{BlockId, PageId};
use crate::core::command::Command;
use crate::core::config::StoreConfig;
use crate::core::export::{export_state, import_state};
use crate::core::page::Page;
use crate::core::state::DocumentState;
use crate::core::storage::Storage;
use crate::Result;
use std::sync::Arc;

/// Holds the current [`DocumentState`] and the policy commands run under.
///
/// The state is shared behind an [`Arc`]: [`DocumentStore::snapshot`] hands out
/// a cheap handle that stays valid (and unchanged) however many commands are
/// dispatched afterwards. A command that does not apply keeps the very same
/// `Arc`, so hosts can skip re-rendering by comparing pointers.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    state: Arc<DocumentState>,
    config: StoreConfig,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl DocumentStore {
    /// A store over an empty document.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_state(DocumentState::new(), config)
    }

    pub fn with_state(state: DocumentState, config: StoreConfig) -> Self {
        Self {
            state: Arc::new(state),
            config,
        }
    }

    /// A store seeded with the first-run welcome document.
    pub fn welcome(config: StoreConfig) -> Self {
        Self::with_state(DocumentState::welcome(), config)
    }

    /// Opens the document saved in `storage`, or the welcome document if none was saved.
    pub fn load(storage: &Storage, config: StoreConfig) -> Result<Self> {
        match storage.load_state()? {
            Some(state) => Ok(Self::with_state(state, config)),
            None => {
                log::info!("no saved document; starting from the welcome document");
                Ok(Self::welcome(config))
            }
        }
    }

    /// Writes the current document to `storage`.
    pub fn save(&self, storage: &Storage) -> Result<()> {
        storage.save_state(&self.state)
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    /// A shared handle to the current state.
    pub fn snapshot(&self) -> Arc<DocumentState> {
        Arc::clone(&self.state)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: StoreConfig) {
        self.config = config;
    }

    /// Applies `command` and returns the resulting state.
    ///
    /// Never fails; a command that does not apply leaves the state as it was.
    pub fn dispatch(&mut self, command: Command) -> &DocumentState {
        match self.state.try_apply(&command, &self.config) {
            Ok(next) => self.state = Arc::new(next),
            Err(e) => log::debug!("{} ignored: {e}", command.name()),
        }
        &self.state
    }

    /// Applies `command`, reporting why it did not apply.
    pub fn try_dispatch(&mut self, command: Command) -> Result<()> {
        let next = self.state.try_apply(&command, &self.config)?;
        self.state = Arc::new(next);
        Ok(())
    }

    /// Runs `f` against a private copy of the state and commits it only if
    /// every step succeeds.
    fn transact<T>(&mut self, f: impl FnOnce(&mut DocumentState, &StoreConfig) -> Result<T>) -> Result<T> {
        let mut next = (*self.state).clone();
        let value = f(&mut next, &self.config)?;
        self.state = Arc::new(next);
        Ok(value)
    }

    /// Creates a page (or folder) and focuses it.
    ///
    /// An empty title becomes the configured default title. When `parent_id`
    /// is given, the parent also receives a page-reference block to the new
    /// page and keeps the focus instead.
    pub fn create_page(
        &mut self,
        title: &str,
        icon: &str,
        parent_id: Option<&str>,
        is_folder: bool,
    ) -> Result<PageId> {
        self.transact(|state, config| {
            let page = new_page(config, title, icon, parent_id, is_folder);
            let page_id = page.id.clone();
            state.add_page(page)?;
            match parent_id {
                Some(parent) => {
                    state.require_page(parent)?;
                    state.append_page_reference(parent, &page_id)?;
                    state.set_current_page(Some(parent))?;
                }
                None => state.set_current_page(Some(&page_id))?,
            }
            Ok(page_id)
        })
    }

    /// Creates a child page of `page_id` and points the page block `block_id` at it.
    pub fn create_page_in_block(
        &mut self,
        page_id: &str,
        block_id: &BlockId,
        title: &str,
        icon: &str,
        is_folder: bool,
    ) -> Result<PageId> {
        self.transact(|state, config| {
            state.require_page(page_id)?;
            let page = new_page(config, title, icon, Some(page_id), is_folder);
            let new_id = page.id.clone();
            state.add_page(page)?;
            state.attach_page_reference(page_id, block_id, &new_id)?;
            Ok(new_id)
        })
    }

    /// Serializes the current document as a snapshot.
    pub fn export(&self) -> Result<String> {
        export_state(&self.state)
    }

    /// Replaces the document with an imported snapshot.
    ///
    /// A snapshot that fails validation leaves the current document in place.
    pub fn import(&mut self, json: &str) -> Result<()> {
        let state = import_state(json)?;
        self.state = Arc::new(state);
        Ok(())
    }
}

fn new_page(
    config: &StoreConfig,
    title: &str,
    icon: &str,
    parent_id: Option<&str>,
    is_folder: bool,
) -> Page {
    let title = if title.trim().is_empty() {
        config.default_page_title.as_str()
    } else {
        title
    };
    let parent_id = parent_id.map(str::to_string);
    if is_folder {
        Page::new_folder(title, icon, parent_id)
    } else {
        Page::new(title, icon, parent_id)
    }
}
