use std::path::{Component, Path};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone when encoding a query component
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape HTML attribute values
pub fn escape_attr(text: &str) -> String {
    escape_html(text)
}

/// Normalize request path
pub fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}

/// First non-empty segment of a request path, the shortcut lookup key
pub fn leading_segment(path: &str) -> &str {
    path.split('/').find(|segment| !segment.is_empty()).unwrap_or("")
}

/// Whether a relative path stays inside the directory it is joined to
pub fn is_contained(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

fn decode_component(value: &str) -> String {
    let spaced = value.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Parse a raw query string into ordered, decoded pairs
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

/// Serialize pairs back into a `?`-prefixed query string
pub fn encode_query(pairs: &[(String, String)]) -> String {
    let encoded: Vec<String> = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect();
    format!("?{}", encoded.join("&"))
}

/// Replace (or append) one parameter while keeping the others in place
pub fn replace_query_param(query: &str, key: &str, value: &str) -> String {
    let mut pairs = parse_query(query);
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some(pair) => pair.1 = value.to_string(),
        None => pairs.push((key.to_string(), value.to_string())),
    }
    pairs.retain(|(k, v)| k == key || !v.is_empty());
    encode_query(&pairs)
}

/// Determine content type for a file based on its extension
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase()) {
        Some(ref ext) if ext == "html" => "text/html; charset=utf-8",
        Some(ref ext) if ext == "css" => "text/css; charset=utf-8",
        Some(ref ext) if ext == "js" => "application/javascript; charset=utf-8",
        Some(ref ext) if ext == "json" => "application/json; charset=utf-8",
        Some(ref ext) if ext == "svg" => "image/svg+xml",
        Some(ref ext) if ext == "png" => "image/png",
        Some(ref ext) if ext == "ico" => "image/x-icon",
        Some(ref ext) if ext == "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
    }

    #[test]
    fn leading_segment_ignores_extra_slashes() {
        assert_eq!(leading_segment("/foo"), "foo");
        assert_eq!(leading_segment("//foo/bar"), "foo");
        assert_eq!(leading_segment("/"), "");
    }

    #[test]
    fn replacing_q_keeps_other_parameters() {
        let location = replace_query_param("?lang=en&q=dogs&model=qwen2", "q", "cats");
        assert_eq!(location, "?lang=en&q=cats&model=qwen2");
        assert_eq!(replace_query_param("", "q", "big cats"), "?q=big%20cats");
        assert_eq!(replace_query_param("?lang=&q=x", "q", "a&b"), "?q=a%26b");
    }

    #[test]
    fn parse_query_decodes_plus_and_percent() {
        let pairs = parse_query("q=rust+lang&lang=%E4%B8%AD%E6%96%87");
        assert_eq!(pairs[0], ("q".to_string(), "rust lang".to_string()));
        assert_eq!(pairs[1].1, "中文");
    }

    #[test]
    fn traversal_is_not_contained() {
        assert!(is_contained(Path::new("css/pages.css")));
        assert!(!is_contained(Path::new("../Cargo.toml")));
        assert!(!is_contained(Path::new("/etc/passwd")));
    }
}
