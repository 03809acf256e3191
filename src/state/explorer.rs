use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::data::{FavoriteEntry, HistoryEntry};
use super::store::{RecordStore, StoreError, DEFAULT_HISTORY_LIMIT};
use crate::fs::listing::{self, DirectoryEntry};

/// The browsing session.
///
/// `Explorer` owns the record store and the pair of values the main screen
/// renders: the current directory and its listing. Intents coming down from
/// the shell (navigate, open, favorite, delete) land here. An empty listing
/// is still a valid browsing state, not a separate one.
pub struct Explorer {
    store: RecordStore,
    current_path: PathBuf,
    current_listing: Vec<DirectoryEntry>,
}

impl Explorer {
    /// Start a browsing session rooted at `root`.
    ///
    /// The store is injected rather than global so the embedding app owns
    /// its lifecycle, and tests can hand in an in-memory one.
    pub fn new(store: RecordStore, root: impl Into<PathBuf>) -> Self {
        let current_path = root.into();
        let current_listing = listing::list_directory(&current_path);

        if let Ok(count) = store.favorite_count() {
            info!("browsing session ready, {count} favorites");
        }

        Explorer {
            store,
            current_path,
            current_listing,
        }
    }

    /// Start a session at the user's home directory, or the filesystem
    /// root when no home is known.
    pub fn open_home(store: RecordStore) -> Self {
        let root = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self::new(store, root)
    }

    /// The directory currently on screen
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// The listing currently on screen, already in display order
    pub fn current_listing(&self) -> &[DirectoryEntry] {
        &self.current_listing
    }

    /// Recompute the listing for the current directory
    pub fn refresh(&mut self) {
        self.current_listing = listing::list_directory(&self.current_path);
    }

    /// Descend into a directory and return the new listing.
    ///
    /// Files are not navigation targets; passing one leaves the session
    /// untouched.
    pub fn navigate_into(&mut self, entry: &DirectoryEntry) -> &[DirectoryEntry] {
        if !entry.is_directory {
            warn!("navigate_into called on file {}", entry.path.display());
            return &self.current_listing;
        }

        self.current_path = entry.path.clone();
        self.refresh();
        &self.current_listing
    }

    /// Move to the parent directory.
    ///
    /// Returns false with no state change when there is no readable
    /// parent, which tells the shell it may leave the browsing context
    /// instead.
    pub fn navigate_up(&mut self) -> bool {
        let Some(parent) = self.current_path.parent().map(Path::to_path_buf) else {
            return false;
        };
        if fs::read_dir(&parent).is_err() {
            warn!("parent of {} is not readable", self.current_path.display());
            return false;
        }

        self.current_path = parent;
        self.refresh();
        true
    }

    /// Record that a file was opened. The current directory does not
    /// change; directories are entered with `navigate_into` instead.
    pub fn open_file(&self, entry: &DirectoryEntry) -> Result<(), StoreError> {
        if entry.is_directory {
            warn!("open_file called on directory {}", entry.path.display());
            return Ok(());
        }

        self.store.add_to_history(&HistoryEntry {
            path: entry.path.to_string_lossy().to_string(),
            name: entry.name.clone(),
            last_opened: Utc::now().timestamp_millis(),
        })
    }

    /// Delete a file (or empty directory), refreshing the listing when
    /// something was actually removed. Failures only show up as the entry
    /// still being there.
    pub fn delete_file(&mut self, entry: &DirectoryEntry) {
        if listing::delete_entry(&entry.path) {
            self.refresh();
        }
    }

    /// Pin an entry to the favorites list
    pub fn add_favorite(&self, entry: &DirectoryEntry) -> Result<(), StoreError> {
        self.store.add_favorite(&FavoriteEntry {
            path: entry.path.to_string_lossy().to_string(),
            name: entry.name.clone(),
            is_directory: entry.is_directory,
        })
    }

    /// Unpin a path; unknown paths are a no-op
    pub fn remove_favorite(&self, path: &str) -> Result<(), StoreError> {
        self.store.remove_favorite(path)
    }

    /// Whether a path is pinned, for the star on each row
    pub fn is_favorite(&self, path: &str) -> Result<bool, StoreError> {
        self.store.is_favorite(path)
    }

    /// Fresh favorites query; reads reflect every completed write
    pub fn favorites(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
        self.store.all_favorites()
    }

    /// The most recently opened files, newest first, at most 20
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.store.recent_history(DEFAULT_HISTORY_LIMIT)
    }
}

impl std::fmt::Debug for Explorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("current_path", &self.current_path)
            .field("entries", &self.current_listing.len())
            .finish()
    }
}
