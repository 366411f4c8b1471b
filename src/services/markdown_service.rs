use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Inline tags model output may use for citations; other raw HTML is escaped
const ALLOWED_TAGS: &[&str] = &["<sup>", "</sup>"];

/// Link targets kept as written; anything else is neutralised
const SAFE_SCHEMES: &[&str] = &["http://", "https://", "mailto:", "#"];

/// Service for rendering streamed markdown into HTML
#[derive(Clone, Copy, Default)]
pub struct MarkdownService;

impl MarkdownService {
    pub fn new() -> Self {
        Self
    }

    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options
    }

    /// Render the full text; called again after every appended chunk
    pub fn render(&self, content: &str) -> String {
        let parser = Parser::new_ext(content, Self::options()).map(|event| match event {
            Event::Html(markup) | Event::InlineHtml(markup) if !is_allowed(&markup) => {
                Event::Text(markup)
            }
            Event::Start(Tag::Link { link_type, dest_url, title, id }) if !is_safe_link(&dest_url) => {
                Event::Start(Tag::Link { link_type, dest_url: CowStr::Borrowed("#"), title, id })
            }
            other => other,
        });
        let mut out = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

fn is_allowed(markup: &CowStr) -> bool {
    let tag = markup.trim().to_ascii_lowercase();
    ALLOWED_TAGS.contains(&tag.as_str())
}

fn is_safe_link(dest: &str) -> bool {
    let dest = dest.trim_start().to_ascii_lowercase();
    SAFE_SCHEMES.iter().any(|scheme| dest.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_citations() {
        let html = MarkdownService::new().render("Cats purr.<sup>[[1](#result-0)]</sup>");
        assert_eq!(html, "<p>Cats purr.<sup>[<a href=\"#result-0\">1</a>]</sup></p>\n");
    }

    #[test]
    fn escapes_other_markup() {
        let html = MarkdownService::new().render("hi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn script_links_are_neutralised() {
        let service = MarkdownService::new();
        let html = service.render("[x](javascript:alert(1)) [y](JavaScript:void(0)) [z](data:text/html,hi)");
        assert!(!html.to_ascii_lowercase().contains("javascript:"));
        assert!(!html.contains("data:text"));
        assert_eq!(html.matches("href=\"#\"").count(), 3);

        let html = service.render("[docs](https://docs.rs) [mail](mailto:a@b.c) [1](#result-0)");
        assert!(html.contains("href=\"https://docs.rs\""));
        assert!(html.contains("href=\"mailto:a@b.c\""));
        assert!(html.contains("href=\"#result-0\""));
    }

    #[test]
    fn incremental_rendering_converges_to_batch_rendering() {
        let chunks = ["## Over", "view\n\n", "- **Cats** are ", "small [[1](#res", "ult-0)]\n", "- *Dogs* bark", "\n\n| a | b |\n|---|---|\n| 1 | 2 |\n"];
        let service = MarkdownService::new();
        let mut accumulated = String::new();
        let mut last = String::new();
        for chunk in chunks {
            accumulated.push_str(chunk);
            last = service.render(&accumulated);
        }
        assert_eq!(last, service.render(&chunks.concat()));
        assert!(last.contains("<h2>Overview</h2>"));
        assert!(last.contains("<table>"));
    }
}
