//! Core library for Blocknotes, a hierarchical block-based document editor.
//!
//! The primary entry point is [`DocumentStore`], which owns the current
//! [`DocumentState`]. All document mutations are [`Command`] values passed to
//! [`DocumentStore::dispatch`]; every state is an immutable snapshot.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.
//!
//! ```rust
//! use blocknotes_core::{Command, DocumentStore, StoreConfig};
//!
//! let mut store = DocumentStore::welcome(StoreConfig::default());
//! let page_id = store.state().pages[0].id.clone();
//!
//! let state = store.dispatch(Command::DeletePage(page_id.clone()));
//! assert!(state.page(&page_id).unwrap().is_deleted);
//! assert!(state.current_page_id.is_none());
//! ```

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    block::{
        Block, BlockData, BlockId, BlockProperties, BlockType, BlockUpdate, DatabaseColumn,
        DatabaseRow, DatabaseView, MediaAlignment, MediaRef, PageId, TextAlignment, TextTransform,
    },
    blocks::numbered_list_index,
    command::Command,
    config::{config_file_path, load_config, save_config, StoreConfig},
    error::{BlocknotesError, Result},
    export::{
        export_state, import_state, peek_snapshot, SnapshotSummary, StateSnapshot, APP_VERSION,
        SNAPSHOT_VERSION,
    },
    index::ReferenceIndex,
    page::Page,
    state::{DocumentState, View},
    storage::Storage,
    store::DocumentStore,
    trash::TrashPolicy,
    tree::PageReference,
};
