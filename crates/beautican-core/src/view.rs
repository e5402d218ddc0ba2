//! # View Tree
//!
//! A small declarative description of markup. The renderer produces it; the
//! page adapter attaches it (or serializes it with [`Node::to_html`]).

use std::fmt::Write;

/// A node in the view tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Elements that never have children or a closing tag.
const VOID_TAGS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

impl Node {
    /// Starts an element.
    pub fn el(tag: &'static str) -> Element {
        Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Node {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Depth-first search for every element carrying `attr`.
    pub fn find_all<'a>(&'a self, attr: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.walk(&mut |el| {
            if el.has_attr(attr) {
                found.push(el);
            }
        });
        found
    }

    fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Element)) {
        if let Node::Element(el) = self {
            f(el);
            el.children.iter().for_each(|c| c.walk(f));
        }
    }

    /// Serializes the tree to HTML, escaping text and attribute values.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&escape(t)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                for (name, value) in &el.attrs {
                    if value.is_empty() {
                        let _ = write!(out, " {}", name);
                    } else {
                        let _ = write!(out, " {}=\"{}\"", name, escape(value));
                    }
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag) {
                    return;
                }
                el.children.iter().for_each(|c| c.write_html(out));
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

impl Element {
    /// Adds an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Adds a value-less attribute such as `data-cart-remove`.
    pub fn flag(self, name: impl Into<String>) -> Self {
        self.attr(name, "")
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| n == name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html() {
        let node: Node = Node::el("div")
            .class("row")
            .child(Node::el("img").attr("src", "a.jpg").attr("alt", "A"))
            .child(Node::el("button").flag("data-cart-remove").text("x"))
            .into();

        assert_eq!(
            node.to_html(),
            r#"<div class="row"><img src="a.jpg" alt="A"><button data-cart-remove>x</button></div>"#
        );
    }

    #[test]
    fn test_escaping() {
        let node: Node = Node::el("p")
            .attr("title", "\"quoted\" & <b>")
            .text("<script>alert('x')</script>")
            .into();
        let html = node.to_html();
        assert!(html.contains("title=\"&quot;quoted&quot; &amp; &lt;b&gt;\""));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_queries() {
        let node: Node = Node::el("div")
            .child(Node::el("span").attr("data-line-key", "a").text("1"))
            .child(Node::el("span").attr("data-line-key", "b").text("2"))
            .into();
        assert_eq!(node.find_all("data-line-key").len(), 2);
        assert_eq!(node.text_content(), "12");
        assert!(node.as_element().unwrap().get_attr("class").is_none());
    }
}
