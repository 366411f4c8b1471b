use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::escape_html;

const STYLESHEET: &str = "<link rel=\"stylesheet\" href=\"/static/css/pages.css\">";

/// What goes into one page shell
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub title: String,
    /// Rendered body, mounted under `#app`
    pub content: String,
    /// Whether `#loading` starts out visible
    pub loading: bool,
    /// Script paths appended at the end of the body
    pub scripts: Vec<&'static str>,
    /// Extra markup for `<head>`, e.g. a refresh directive
    pub head: String,
}

/// Component for handling HTML template rendering
#[derive(Debug, Clone)]
pub struct TemplateComponent {
    static_dir: PathBuf,
}

impl TemplateComponent {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self { static_dir: static_dir.into() }
    }

    fn base_template(&self) -> Option<String> {
        let path = self.static_dir.join(Path::new("html/base.html"));
        match fs::read_to_string(&path) {
            Ok(base) => Some(base),
            Err(e) => {
                log::debug!("No base template at {:?} ({}), using inline shell", path, e);
                None
            }
        }
    }

    /// Wrap a page body in the shell; `#app` and `#loading` are always present
    pub fn render(&self, context: &PageContext) -> String {
        let loading = loading_indicator(context.loading);
        let scripts: String = context
            .scripts
            .iter()
            .map(|src| format!("<script src=\"{}\" defer></script>", src))
            .collect();
        let head = format!("{}{}", STYLESHEET, context.head);
        let title = escape_html(&context.title);

        if let Some(base) = self.base_template() {
            return fill(
                &base,
                &[
                    ("TITLE", title.as_str()),
                    ("HEAD", head.as_str()),
                    ("CONTENT", context.content.as_str()),
                    ("LOADING", loading.as_str()),
                    ("SCRIPTS", scripts.as_str()),
                ],
            );
        }

        format!(
            "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>{}</title>{}</head><body><main id=\"app\" class=\"container\">{}</main>{}{}</body></html>",
            title, head, context.content, loading, scripts
        )
    }
}

/// Substitute `{{NAME}}` placeholders in one pass; inserted values are never rescanned
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            let name = &after[..end];
            values.iter().find(|(key, _)| *key == name).map(|(_, value)| (*value, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn loading_indicator(visible: bool) -> String {
    if visible {
        "<div id=\"loading\" class=\"loading\">Loading…</div>".to_string()
    } else {
        "<div id=\"loading\" class=\"loading\" hidden>Loading…</div>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PageContext {
        PageContext {
            title: "Search <cats>".to_string(),
            content: "<p>body</p>".to_string(),
            scripts: vec!["/static/js/search.js"],
            ..Default::default()
        }
    }

    #[test]
    fn inline_shell_has_mount_points() {
        let html = TemplateComponent::new("/nonexistent").render(&context());
        assert!(html.contains("<main id=\"app\" class=\"container\"><p>body</p></main>"));
        assert!(html.contains("<div id=\"loading\" class=\"loading\" hidden>"));
        assert!(html.contains("<title>Search &lt;cats&gt;</title>"));
        assert!(html.contains("<script src=\"/static/js/search.js\" defer></script>"));
    }

    #[test]
    fn loading_indicator_visible_while_in_flight() {
        let html = TemplateComponent::new("/nonexistent").render(&PageContext { loading: true, ..context() });
        assert!(html.contains("<div id=\"loading\" class=\"loading\">"));
    }

    #[test]
    fn placeholder_text_in_values_is_left_alone() {
        let html = fill(
            "<title>{{TITLE}}</title><main>{{CONTENT}}</main>{{UNKNOWN}}",
            &[("TITLE", "{{CONTENT}} - Search"), ("CONTENT", "<p>{{TITLE}}</p>")],
        );
        assert_eq!(html, "<title>{{CONTENT}} - Search</title><main><p>{{TITLE}}</p></main>{{UNKNOWN}}");
    }

    #[test]
    fn page_titled_with_a_placeholder_keeps_body_out_of_title() {
        let templates = TemplateComponent::new(env!("CARGO_MANIFEST_DIR").to_string() + "/static");
        let html = templates.render(&PageContext { title: "{{CONTENT}}".to_string(), ..context() });
        assert!(html.contains("<title>{{CONTENT}}</title>"));
        assert_eq!(html.matches("<p>body</p>").count(), 1);
    }

    #[test]
    fn base_template_placeholders_are_filled() {
        let html = TemplateComponent::new(env!("CARGO_MANIFEST_DIR").to_string() + "/static").render(&context());
        assert!(html.contains("id=\"app\""));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("/static/css/pages.css"));
        assert!(!html.contains("{{"));
    }
}
