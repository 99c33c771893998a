//! Document export and import as versioned JSON snapshots.

use serde::{Deserialize, Serialize};

use crate::core::state::DocumentState;
use crate::{BlocknotesError, Result};

/// Version of the application that wrote a snapshot.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current snapshot format version. Newer snapshots are refused on import.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Top-level JSON structure of an exported document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub version: u32,
    pub app_version: String,
    pub state: DocumentState,
}

/// Counts read from a snapshot without installing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub app_version: String,
    pub page_count: usize,
    pub trash_count: usize,
}

/// Serializes `state` as a pretty-printed snapshot document.
pub fn export_state(state: &DocumentState) -> Result<String> {
    let snapshot = StateSnapshot {
        version: SNAPSHOT_VERSION,
        app_version: APP_VERSION.to_string(),
        state: state.clone(),
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Parses a snapshot document and returns the validated, normalized state.
///
/// # Errors
///
/// Returns [`BlocknotesError::Json`] for malformed input,
/// [`BlocknotesError::InvalidSnapshot`] for an unsupported version or duplicate
/// ids, and [`BlocknotesError::CyclicHierarchy`] if the page tree loops.
pub fn import_state(json: &str) -> Result<DocumentState> {
    let snapshot = read_snapshot(json)?;
    let mut state = snapshot.state;
    if let Err(e) = state.normalize() {
        log::warn!("rejecting snapshot from {}: {e}", snapshot.app_version);
        return Err(e);
    }
    log::info!(
        "imported snapshot from {} with {} page(s)",
        snapshot.app_version,
        state.pages.len()
    );
    Ok(state)
}

/// Reads a snapshot's metadata without validating its hierarchy.
pub fn peek_snapshot(json: &str) -> Result<SnapshotSummary> {
    let snapshot = read_snapshot(json)?;
    Ok(SnapshotSummary {
        page_count: snapshot.state.pages.iter().filter(|p| !p.is_deleted).count(),
        trash_count: snapshot.state.pages.iter().filter(|p| p.is_deleted).count(),
        app_version: snapshot.app_version,
    })
}

fn read_snapshot(json: &str) -> Result<StateSnapshot> {
    let snapshot: StateSnapshot = serde_json::from_str(json)?;
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(BlocknotesError::InvalidSnapshot(format!(
            "snapshot version {} is newer than supported version {SNAPSHOT_VERSION}",
            snapshot.version
        )));
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, StoreConfig};

    #[test]
    fn test_snapshot_serialization() {
        let json = export_state(&DocumentState::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["appVersion"], APP_VERSION);
        assert_eq!(value["state"]["pages"], serde_json::json!([]));
    }

    #[test]
    fn test_export_then_import_is_equal() {
        let state = DocumentState::welcome();
        let trashed = state.pages[3].id.clone();
        let state = state.apply(&Command::DeletePage(trashed), &StoreConfig::default());

        let imported = import_state(&export_state(&state).unwrap()).unwrap();
        assert_eq!(imported, state);
    }

    #[test]
    fn test_import_rejects_cycle() {
        let mut state = DocumentState::welcome();
        let child = state.pages[2].id.clone();
        state.pages[1].parent_id = Some(child);
        let json = export_state(&state).unwrap();

        assert!(matches!(import_state(&json), Err(BlocknotesError::CyclicHierarchy(_))));
        assert_eq!(peek_snapshot(&json).unwrap().page_count, 4);
    }

    #[test]
    fn test_import_rejects_newer_version() {
        let json = r#"{"version": 99, "appVersion": "9.0.0", "state": {"pages": []}}"#;
        assert!(matches!(import_state(json), Err(BlocknotesError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_snapshot_version_is_reexported() {
        assert_eq!(crate::core::SNAPSHOT_VERSION, crate::SNAPSHOT_VERSION);
        let json = export_state(&DocumentState::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], crate::core::SNAPSHOT_VERSION);
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(import_state("not json"), Err(BlocknotesError::Json(_))));
    }

    #[test]
    fn test_peek_counts_trash() {
        let mut state = DocumentState::welcome();
        state.pages[0].is_deleted = true;
        state.current_page_id = None;
        let summary = peek_snapshot(&export_state(&state).unwrap()).unwrap();

        assert_eq!(summary.page_count, 3);
        assert_eq!(summary.trash_count, 1);
        assert_eq!(summary.app_version, APP_VERSION);
    }
}
