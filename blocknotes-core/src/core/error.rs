//! Error types for the Blocknotes core library.

use thiserror::Error;

/// All errors that can occur within the Blocknotes core library.
///
/// Command dispatch through [`DocumentStore`](super::store::DocumentStore) never
/// surfaces these: a failing command leaves the state unchanged. They are
/// returned by the checked entry points and by the persistence layer.
#[derive(Debug, Error)]
pub enum BlocknotesError {
    /// A page ID was requested that does not exist in the document.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A block ID was requested that does not exist on the given page.
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// A reparent operation would create a cycle or is otherwise invalid.
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// A block payload does not fit the block's type.
    #[error("Invalid block data: {0}")]
    InvalidBlockData(String),

    /// A block index was outside the page's block sequence.
    #[error("Index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The page hierarchy contains a cycle.
    #[error("Cyclic hierarchy at page {0}")]
    CyclicHierarchy(String),

    /// A command was not applicable to the current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A serialized snapshot could not be installed.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document data could not be (de)serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`BlocknotesError`].
pub type Result<T> = std::result::Result<T, BlocknotesError>;

impl BlocknotesError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::PageNotFound(_) => "Page no longer exists".to_string(),
            Self::BlockNotFound(_) => "Block no longer exists".to_string(),
            Self::InvalidMove(msg) => msg.clone(),
            Self::InvalidBlockData(msg) => format!("Block data does not match its type: {msg}"),
            Self::IndexOutOfRange { .. } => "Block position is out of range".to_string(),
            Self::CyclicHierarchy(_) => "The page hierarchy is corrupted".to_string(),
            Self::InvalidState(msg) => msg.clone(),
            Self::InvalidSnapshot(_) => "Could not load the saved document".to_string(),
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_move_message_passes_through() {
        let e = BlocknotesError::InvalidMove("Cannot move a page into its own descendant".to_string());
        assert_eq!(e.user_message(), "Cannot move a page into its own descendant");
        assert!(e.to_string().starts_with("Invalid move"));
    }

    #[test]
    fn test_index_out_of_range_display() {
        let e = BlocknotesError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(e.to_string(), "Index out of range: 7 (len 3)");
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let e: BlocknotesError = err.into();
        assert!(e.user_message().starts_with("Data format error"));
    }
}
