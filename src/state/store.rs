use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::data::{FavoriteEntry, HistoryEntry};

/// History queries never return more rows than this
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Failures surfaced by the record store.
///
/// Filesystem trouble while browsing is absorbed elsewhere; a store that
/// cannot accept a write has to tell the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database rejected the operation or is unavailable
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The directory meant to hold the database could not be created
    #[error("could not create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The RecordStore manages the SQLite database behind favorites and
/// recently-opened history. Both tables are keyed by absolute path and
/// written with insert-or-replace, so a path never appears twice.
pub struct RecordStore {
    conn: Connection,
    db_path: PathBuf,
}

impl RecordStore {
    /// Open (or create) the store at its default location.
    ///
    /// The database file lives in the user's data directory:
    /// - Linux: ~/.local/share/pocket-files/file_manager.db
    /// - macOS: ~/Library/Application Support/pocket-files/file_manager.db
    /// - Windows: %APPDATA%\pocket-files\file_manager.db
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open_at(&Self::default_db_path())
    }

    /// Open (or create) the store at an explicit location.
    ///
    /// Connections are per-thread; a background worker opens its own
    /// connection against the same path.
    pub fn open_at(db_path: &Path) -> Result<Self, StoreError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(db_path)?;
        info!("record store initialized at {}", db_path.display());

        let store = RecordStore {
            conn,
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an ephemeral store that lives only as long as the connection.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = RecordStore {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Where the database goes unless the caller picks a spot
    fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("pocket-files");
        path.push("file_manager.db");
        path
    }

    /// Initialize the database schema.
    /// Schema version 1; both tables are created idempotently.
    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS favorites (
                path            TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                is_directory    INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS history (
                path            TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                last_opened     INTEGER NOT NULL
            )",
            [],
        )?;

        // Index for the "most recent first" history query
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_history_last_opened
             ON history(last_opened DESC)",
            [],
        )?;

        debug!("database schema initialized");
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Number of favorites currently stored
    pub fn favorite_count(&self) -> Result<i64, StoreError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Add a favorite, replacing any existing entry for the same path
    pub fn add_favorite(&self, entry: &FavoriteEntry) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO favorites (path, name, is_directory) VALUES (?1, ?2, ?3)",
            rusqlite::params![entry.path, entry.name, entry.is_directory],
        )?;
        Ok(())
    }

    /// Remove a favorite by path; removing an absent path is a no-op
    pub fn remove_favorite(&self, path: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM favorites WHERE path = ?1", [path])?;
        Ok(())
    }

    /// Whether a path is currently favorited
    pub fn is_favorite(&self, path: &str) -> Result<bool, StoreError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE path = ?1)",
            [path],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Get all favorites; the order is unspecified
    pub fn all_favorites(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT path, name, is_directory FROM favorites")?;

        let rows = stmt.query_map([], |row| {
            Ok(FavoriteEntry {
                path: row.get(0)?,
                name: row.get(1)?,
                is_directory: row.get(2)?,
            })
        })?;

        let mut favorites = Vec::new();
        for entry in rows {
            favorites.push(entry?);
        }

        Ok(favorites)
    }

    /// Record an open, replacing any existing entry for the same path so
    /// the new timestamp wins
    pub fn add_to_history(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO history (path, name, last_opened) VALUES (?1, ?2, ?3)",
            rusqlite::params![entry.path, entry.name, entry.last_opened],
        )?;
        Ok(())
    }

    /// Get the most recently opened files, newest first, capped at `limit`
    pub fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT path, name, last_opened FROM history
             ORDER BY last_opened DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map([limit], |row| {
            Ok(HistoryEntry {
                path: row.get(0)?,
                name: row.get(1)?,
                last_opened: row.get(2)?,
            })
        })?;

        let mut history = Vec::new();
        for entry in rows {
            history.push(entry?);
        }

        Ok(history)
    }
}

// Implement Debug by hand; Connection has no Debug
impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}
