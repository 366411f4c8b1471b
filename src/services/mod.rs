pub mod icon_service;
pub mod loader;
pub mod markdown_service;
pub mod search_service;

pub use icon_service::{resolve_icon, Glyph, IconSpec, PALETTE};
pub use loader::{DataLoader, Source};
pub use markdown_service::MarkdownService;
pub use search_service::{SearchApi, SearchService};
