/// Shared data structures for the application state
///
/// These structs mirror the two database tables and flow between
/// the store and the UI shell.
use serde::{Deserialize, Serialize};

/// A file or directory the user pinned for quick access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Absolute path, unique per entry
    pub path: String,
    /// Display name (basename), cached so rendering never touches the disk
    pub name: String,
    /// Classification at the time of favoriting; not revalidated later
    pub is_directory: bool,
}

/// A recently opened file.
///
/// A path appears at most once; reopening updates `last_opened` in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Absolute path, unique per entry
    pub path: String,
    /// Display name (basename)
    pub name: String,
    /// Milliseconds since epoch of the most recent open
    pub last_opened: i64,
}
