use log::{info, warn};

use crate::components::bookmarks::{bookmarks, load_error};
use crate::components::Node;
use crate::services::{DataLoader, Source};
use crate::types::BookmarkFolder;

/// Outcome of loading the bookmarks page
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarksState {
    Loaded(Vec<BookmarkFolder>),
    Failed(String),
}

impl BookmarksState {
    /// Load the folder list once; failures become an explicit state
    pub async fn load(loader: &DataLoader, source: &Source) -> Self {
        match loader.load_bookmarks(source).await {
            Ok(folders) => {
                info!("Rendering {} bookmark folders", folders.len());
                BookmarksState::Loaded(folders)
            }
            Err(err) => {
                warn!("Bookmarks unavailable: {}", err);
                BookmarksState::Failed(err.to_string())
            }
        }
    }

    pub fn view(&self) -> Node {
        match self {
            BookmarksState::Loaded(folders) => bookmarks(folders),
            BookmarksState::Failed(message) => load_error(message),
        }
    }
}
