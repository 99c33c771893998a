//! SQLite-backed persistence of document snapshots.

use crate::core::export::{export_state, import_state};
use crate::core::state::DocumentState;
use crate::{BlocknotesError, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Key under which the document snapshot is stored.
const DOCUMENT_KEY: &str = "document";

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'app_state'",
            [],
            |row| row.get(0),
        )?;

        if table_count != 1 {
            return Err(BlocknotesError::InvalidState(
                "Not a valid Blocknotes database".to_string(),
            ));
        }

        Ok(Self { conn })
    }

    /// An in-memory database, mainly for tests and ephemeral sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Writes `state` as the stored document, replacing any previous one.
    pub fn save_state(&self, state: &DocumentState) -> Result<()> {
        let json = export_state(state)?;
        self.conn.execute(
            "INSERT INTO app_state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![DOCUMENT_KEY, json, chrono::Utc::now().timestamp()],
        )?;
        log::info!("saved document with {} page(s)", state.pages.len());
        Ok(())
    }

    /// Reads the stored document, or `None` if nothing has been saved yet.
    pub fn load_state(&self) -> Result<Option<DocumentState>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                [DOCUMENT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => {
                let state = import_state(&json)?;
                log::info!("loaded document with {} page(s)", state.pages.len());
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    /// Removes the stored document.
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM app_state WHERE key = ?1", [DOCUMENT_KEY])?;
        log::info!("cleared stored document");
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
