/// Local file manager core
///
/// This crate implements the portable model behind a small file manager:
/// - Directory listings sorted for browsing (fs/listing.rs)
/// - Text/JSON and image previews (fs/preview.rs)
/// - Favorites and recently-opened history in SQLite (state/store.rs)
/// - The browsing session tying them together (state/explorer.rs)
///
/// Rendering, permission prompts and "open with" dispatch belong to the
/// embedding shell; this crate only hands it data.
pub mod fs;
pub mod state;

pub use fs::listing::{delete_entry, list_directory, list_directory_async, DirectoryEntry};
pub use fs::preview::{load_preview, load_preview_async, mime_type, Preview, PreviewError};
pub use state::data::{FavoriteEntry, HistoryEntry};
pub use state::explorer::Explorer;
pub use state::store::{RecordStore, StoreError, DEFAULT_HISTORY_LIMIT};
