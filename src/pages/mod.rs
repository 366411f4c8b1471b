//! Page-level state and orchestration, independent of HTTP.

pub mod bookmarks;
pub mod search;
pub mod shortcuts;

pub use bookmarks::BookmarksState;
pub use search::{Phase, SearchApp, SearchState};
pub use shortcuts::{Navigation, Redirector};
