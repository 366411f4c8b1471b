use super::element::{fragment, h, Node};
use crate::services::icon_service::{resolve_icon, Glyph, IconSpec};
use crate::types::{Bookmark, BookmarkFolder};

/// Client-side load state of a link's image icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    Pending,
    Loaded,
    Failed,
}

// Swap glyph and image once the browser reports the outcome
const ON_LOAD: &str = "this.style.display='block';this.previousElementSibling.style.display='none'";
const ON_ERROR: &str = "this.style.display='none';this.previousElementSibling.style.display='flex'";

fn glyph_node(glyph: &Glyph, visible: bool) -> Node {
    h("span")
        .class("link-icon")
        .style("display", if visible { "flex" } else { "none" })
        .style("background-color", glyph.background)
        .child(glyph.text.as_str())
        .into()
}

/// Glyph and optional image; the glyph shows until the image has loaded
pub fn link_icon(spec: &IconSpec, load: ImageLoad) -> Node {
    let image_visible = load == ImageLoad::Loaded;
    match spec {
        IconSpec::Glyph(glyph) => glyph_node(glyph, true),
        IconSpec::Image { src, fallback } => fragment([
            glyph_node(fallback, !image_visible),
            h("img")
                .class("link-icon")
                .attr("src", src.as_str())
                .attr("alt", "")
                .attr("onload", ON_LOAD)
                .attr("onerror", ON_ERROR)
                .style("display", if image_visible { "block" } else { "none" })
                .into(),
        ]),
    }
}

pub fn link(bookmark: &Bookmark, index: usize) -> Node {
    let icon = resolve_icon(bookmark, index);
    h("a")
        .attr("href", bookmark.url.as_str())
        .child(link_icon(&icon, ImageLoad::Pending))
        .child(bookmark.title.as_str())
        .into()
}

pub fn folder(folder: &BookmarkFolder) -> Node {
    h("div")
        .child(h("h3").child(folder.name.as_str()))
        .child(
            h("ul").class("grid").children(folder.links.iter().enumerate().map(|(index, bookmark)| {
                h("li")
                    .class("col-3 col-lg-4 col-sm-6 link")
                    .child(link(bookmark, index))
            })),
        )
        .into()
}

pub fn bookmarks(folders: &[BookmarkFolder]) -> Node {
    h("div")
        .class("bookmarks")
        .child(h("h2").child("Bookmarks"))
        .children(folders.iter().map(folder))
        .into()
}

pub fn load_error(message: &str) -> Node {
    h("div")
        .class("bookmarks error")
        .child(h("h2").child("Bookmarks"))
        .child(h("p").class("error-message").child("The bookmark list could not be loaded."))
        .child(h("pre").child(message))
        .into()
}
