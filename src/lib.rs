//! Signpost - a start page with bookmarks, summarized search and shortcuts
//!
//! Pages are rendered server-side from an element tree; the search page
//! receives its live regions over Server-Sent Events while a language model
//! streams an overview of the results.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod llm;
pub mod logger;
pub mod pages;
pub mod server;
pub mod services;
pub mod store;
pub mod summary;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::PageError;
pub use server::{build_router, serve};
pub use types::{AppState, Bookmark, BookmarkFolder, SearchResult, ShortcutMap};
