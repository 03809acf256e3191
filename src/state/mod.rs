/// State management module
///
/// This module handles all session state, including:
/// - Database access for favorites and history (store.rs)
/// - Shared data structures (data.rs)
/// - The browsing session and the intents it consumes (explorer.rs)
pub mod data;
pub mod explorer;
pub mod store;
