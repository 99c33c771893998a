//! Store settings persistence.
//!
//! Holds the policy knobs of a [`DocumentStore`](super::store::DocumentStore)
//! in a JSON file at an OS-appropriate location.

use crate::core::trash::TrashPolicy;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Policy applied by the store when it executes commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Which relatives follow a page into the trash or out of existence.
    pub trash: TrashPolicy,
    /// Appended to a page title when the page is duplicated.
    pub duplicate_suffix: String,
    /// Title given to pages created without one.
    pub default_page_title: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            trash: TrashPolicy::default(),
            duplicate_suffix: "(Copy)".to_string(),
            default_page_title: "Untitled".to_string(),
        }
    }
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/blocknotes/settings.json`
/// - Windows: `%APPDATA%/Blocknotes/settings.json`
pub fn config_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("Blocknotes").join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("blocknotes").join("settings.json")
    }
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_config(path: &Path) -> StoreConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring corrupt settings file {}: {e}", path.display());
            StoreConfig::default()
        }),
        Err(_) => StoreConfig::default(),
    }
}

/// Saves settings to `path`, creating parent directories as needed.
pub fn save_config(path: &Path, config: &StoreConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    log::info!("saved settings to {}", path.display());
    Ok(())
}
