pub mod bookmarks;
pub mod element;
pub mod search;
pub mod shortcuts;
pub mod templates;

pub use element::{fragment, h, raw, Element, Node};
pub use search::{render_regions, Region, RegionCache};
pub use templates::{PageContext, TemplateComponent};
