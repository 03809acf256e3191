/// Filesystem module
///
/// This module handles:
/// - Listing a directory's immediate children in display order
/// - Best-effort deletion of files and empty directories
/// - Building text/JSON and image previews
pub mod listing;
pub mod preview;
