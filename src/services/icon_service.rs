use crate::types::Bookmark;

/// Fallback glyph backgrounds, picked by list position
pub const PALETTE: [&str; 19] = [
    "rgb(255, 179, 186)",
    "rgb(255, 223, 186)",
    "rgb(255, 255, 186)",
    "rgb(186, 255, 201)",
    "rgb(186, 225, 255)",
    "rgb(223, 186, 255)",
    "rgb(255, 179, 255)",
    "rgb(179, 255, 255)",
    "rgb(191, 207, 255)",
    "rgb(204, 255, 204)",
    "rgb(255, 230, 204)",
    "rgb(230, 230, 250)",
    "rgb(255, 240, 245)",
    "rgb(240, 248, 255)",
    "rgb(255, 250, 205)",
    "rgb(255, 228, 225)",
    "rgb(240, 255, 240)",
    "rgb(255, 255, 224)",
    "rgb(255, 218, 185)",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub background: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IconSpec {
    Glyph(Glyph),
    /// Remote or inline image, with the glyph shown until it loads
    Image { src: String, fallback: Glyph },
}

impl IconSpec {
    pub fn glyph(&self) -> &Glyph {
        match self {
            IconSpec::Glyph(glyph) => glyph,
            IconSpec::Image { fallback, .. } => fallback,
        }
    }
}

pub fn is_resource(icon: &str) -> bool {
    icon.starts_with("http://") || icon.starts_with("https://") || icon.starts_with("data:")
}

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn resolve_icon(bookmark: &Bookmark, index: usize) -> IconSpec {
    let icon = bookmark.icon.as_deref().map(str::trim).filter(|i| !i.is_empty());
    let text = match icon {
        Some(icon) if !is_resource(icon) => icon.to_string(),
        _ => bookmark.title.chars().next().map(String::from).unwrap_or_default(),
    };
    let glyph = Glyph { text, background: palette_color(index) };
    match icon {
        Some(src) if is_resource(src) => IconSpec::Image { src: src.to_string(), fallback: glyph },
        _ => IconSpec::Glyph(glyph),
    }
}
