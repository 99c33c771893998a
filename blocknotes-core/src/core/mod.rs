//! Internal domain modules for the Blocknotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod block;
pub mod blocks;
pub mod command;
pub mod config;
pub mod error;
pub mod export;
pub mod index;
pub mod page;
pub mod state;
pub mod storage;
pub mod store;
pub mod trash;
pub mod tree;

#[doc(inline)]
pub use block::{
    Block, BlockData, BlockId, BlockProperties, BlockType, BlockUpdate, DatabaseColumn,
    DatabaseRow, DatabaseView, MediaAlignment, MediaRef, PageId, TextAlignment, TextTransform,
};
#[doc(inline)]
pub use blocks::numbered_list_index;
#[doc(inline)]
pub use command::Command;
#[doc(inline)]
pub use config::{config_file_path, load_config, save_config, StoreConfig};
#[doc(inline)]
pub use error::{BlocknotesError, Result};
#[doc(inline)]
pub use export::{
    export_state, import_state, peek_snapshot, SnapshotSummary, StateSnapshot, APP_VERSION,
    SNAPSHOT_VERSION,
};
#[doc(inline)]
pub use index::ReferenceIndex;
#[doc(inline)]
pub use page::Page;
#[doc(inline)]
pub use state::{DocumentState, View};
#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use store::DocumentStore;
#[doc(inline)]
pub use trash::TrashPolicy;
#[doc(inline)]
pub use tree::PageReference;
