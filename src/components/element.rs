//! Declarative element tree used by every page component.
//!
//! Components build a [`Node`] from state; [`Node::to_html`] serialises it
//! with text and attribute values escaped.

use std::fmt;

use crate::utils::{escape_attr, escape_html};

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Trusted markup, inserted verbatim
    Raw(String),
    Fragment(Vec<Node>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, Option<String>)>,
    styles: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

/// Start a new element
pub fn h(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        styles: Vec::new(),
        children: Vec::new(),
    }
}

pub fn raw(markup: impl Into<String>) -> Node {
    Node::Raw(markup.into())
}

pub fn fragment(nodes: impl IntoIterator<Item = Node>) -> Node {
    Node::Fragment(nodes.into_iter().collect())
}

impl Element {
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, Some(value.into())));
        self
    }

    /// Boolean attribute such as `hidden` or `autofocus`
    pub fn flag(mut self, name: &'static str, on: bool) -> Self {
        if on {
            self.attrs.push((name, None));
        }
        self
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.styles.push((property, value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    fn style_value(&self) -> String {
        self.styles
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
        }
        if !self.styles.is_empty() {
            out.push_str(" style=\"");
            out.push_str(&escape_attr(&self.style_value()));
            out.push('"');
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(value) => out.push_str(&escape_html(value)),
            Node::Raw(markup) => out.push_str(markup),
            Node::Fragment(nodes) => {
                for node in nodes {
                    node.write_html(out);
                }
            }
            Node::Empty => {}
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Node::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_elements_with_escaping() {
        let node: Node = h("a")
            .attr("href", "/search?q=a&b")
            .child("Tom & Jerry")
            .into();
        assert_eq!(node.to_html(), "<a href=\"/search?q=a&amp;b\">Tom &amp; Jerry</a>");
    }

    #[test]
    fn void_elements_and_flags() {
        let node: Node = h("input").attr("name", "q").flag("autofocus", true).flag("hidden", false).into();
        assert_eq!(node.to_html(), "<input name=\"q\" autofocus>");
    }

    #[test]
    fn styles_are_joined() {
        let node: Node = h("span").style("display", "flex").style("background-color", "red").into();
        assert_eq!(node.to_html(), "<span style=\"display: flex; background-color: red\"></span>");
    }

    #[test]
    fn options_render_as_nothing_when_absent() {
        let missing: Option<Element> = None;
        let node: Node = h("li").child(missing).child(Some(h("b"))).into();
        assert_eq!(node.to_html(), "<li><b></b></li>");
    }
}
