use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// One child of a directory at the moment it was read.
///
/// Entries are immutable snapshots; nothing refreshes them if the
/// underlying file changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Absolute path of the child
    pub path: PathBuf,
    /// Basename used for display and sorting
    pub name: String,
    pub is_directory: bool,
    /// Milliseconds since epoch of the last modification, when available
    pub last_modified: Option<i64>,
    /// File size in bytes; for directories, the number of immediate children
    pub size: u64,
}

impl DirectoryEntry {
    /// Read a single path into an entry. Metadata failures degrade to
    /// zero/unknown values rather than dropping the entry from the listing.
    fn read(path: &Path) -> Self {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let is_directory = path.is_dir();

        let metadata = fs::metadata(path).ok();
        let last_modified = metadata
            .as_ref()
            .and_then(|m| m.modified().ok())
            .map(|t| DateTime::<Utc>::from(t).timestamp_millis());
        let size = if is_directory {
            fs::read_dir(path)
                .map(|children| children.count() as u64)
                .unwrap_or(0)
        } else {
            metadata.map(|m| m.len()).unwrap_or(0)
        };

        DirectoryEntry {
            path: path.to_path_buf(),
            name,
            is_directory,
            last_modified,
            size,
        }
    }

    /// Human-readable "modified | size" line for the entry row,
    /// e.g. "03/08/2026 14:02 | 12 KB" or "03/08/2026 14:02 | 4 items".
    pub fn details(&self) -> String {
        let date = self
            .last_modified
            .and_then(|ms| Local.timestamp_millis_opt(ms).single())
            .map(|d| d.format("%d/%m/%Y %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        let size = if self.is_directory {
            format!("{} items", self.size)
        } else {
            format!("{} KB", self.size / 1024)
        };

        format!("{date} | {size}")
    }
}

/// List the immediate children of `dir` in display order.
///
/// A nonexistent or unreadable directory yields an empty listing; a
/// browsing screen has nothing useful to do with the failure, so it is
/// logged and swallowed.
pub fn list_directory(dir: &Path) -> Vec<DirectoryEntry> {
    let mut entries = Vec::new();
    for child in WalkDir::new(dir).min_depth(1).max_depth(1) {
        match child {
            Ok(child) => entries.push(DirectoryEntry::read(child.path())),
            Err(err) => warn!("error listing {}: {}", dir.display(), err),
        }
    }

    // Directories sort before files, then case-insensitive by name.
    // The sort is stable, so equal names keep enumeration order.
    entries.sort_by(|a, b| {
        (!a.is_directory)
            .cmp(&!b.is_directory)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    entries
}

/// `list_directory` on the blocking pool, for callers that must not stall
/// a foreground loop. A superseded call's result is simply dropped by the
/// caller; there is no cancellation.
pub async fn list_directory_async(dir: PathBuf) -> Vec<DirectoryEntry> {
    tokio::task::spawn_blocking(move || list_directory(&dir))
        .await
        .unwrap_or_else(|err| {
            warn!("listing task failed: {err}");
            Vec::new()
        })
}

/// Delete a file, or a directory only if it is empty.
///
/// Returns whether anything was removed. Denied or busy targets log and
/// return false; the entry will still be there on the next refresh.
pub fn delete_entry(path: &Path) -> bool {
    let result = if path.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("could not delete {}: {}", path.display(), err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn directories_sort_before_files_case_insensitively() {
        let root = tempdir().expect("tempdir");
        fs::write(root.path().join("b.txt"), "b").expect("write b");
        fs::create_dir(root.path().join("A")).expect("create A");
        fs::write(root.path().join("a.txt"), "a").expect("write a");

        let names: Vec<String> = list_directory(root.path())
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["A", "a.txt", "b.txt"]);
    }

    #[test]
    fn missing_directory_lists_empty() {
        let root = tempdir().expect("tempdir");
        assert!(list_directory(&root.path().join("never-created")).is_empty());
    }

    #[test]
    fn file_entries_carry_byte_size_and_mtime() {
        let root = tempdir().expect("tempdir");
        fs::write(root.path().join("hello.txt"), "hello").expect("write file");

        let listing = list_directory(root.path());
        assert_eq!(listing.len(), 1);
        let entry = &listing[0];
        assert!(!entry.is_directory);
        assert_eq!(entry.size, 5);
        assert!(entry.last_modified.is_some());
    }

    #[test]
    fn directory_entries_count_children() {
        let root = tempdir().expect("tempdir");
        let sub = root.path().join("sub");
        fs::create_dir(&sub).expect("create sub");
        fs::write(sub.join("one.txt"), "1").expect("write one");
        fs::write(sub.join("two.txt"), "2").expect("write two");
        fs::create_dir(sub.join("nested")).expect("create nested");

        let listing = list_directory(root.path());
        assert_eq!(listing.len(), 1);
        assert!(listing[0].is_directory);
        assert_eq!(listing[0].size, 3);
    }

    #[test]
    fn details_distinguish_files_from_directories() {
        let root = tempdir().expect("tempdir");
        fs::create_dir(root.path().join("docs")).expect("create docs");
        fs::write(root.path().join("big.bin"), vec![0u8; 2048]).expect("write big");

        let listing = list_directory(root.path());
        assert!(listing[0].details().contains("0 items"));
        assert!(listing[1].details().contains("2 KB"));
    }

    #[test]
    fn delete_entry_removes_files() {
        let root = tempdir().expect("tempdir");
        let target = root.path().join("junk.txt");
        fs::write(&target, "x").expect("write junk");

        assert!(delete_entry(&target));
        assert!(!target.exists());
    }

    #[test]
    fn delete_entry_reports_missing_targets() {
        let root = tempdir().expect("tempdir");
        assert!(!delete_entry(&root.path().join("ghost.txt")));
    }

    #[test]
    fn delete_entry_only_removes_empty_directories() {
        let root = tempdir().expect("tempdir");
        let full = root.path().join("full");
        fs::create_dir(&full).expect("create full");
        fs::write(full.join("keep.txt"), "x").expect("write keep");

        assert!(!delete_entry(&full));
        assert!(full.exists());

        fs::remove_file(full.join("keep.txt")).expect("empty it");
        assert!(delete_entry(&full));
        assert!(!full.exists());
    }

    #[tokio::test]
    async fn async_listing_matches_the_blocking_one() {
        let root = tempdir().expect("tempdir");
        fs::write(root.path().join("same.txt"), "x").expect("write file");

        let blocking = list_directory(root.path());
        let background = list_directory_async(root.path().to_path_buf()).await;
        assert_eq!(blocking, background);
    }
}
