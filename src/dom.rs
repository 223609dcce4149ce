//! Owned HTML node tree standing in for the page DOM.
//!
//! Rendered messages are parsed into this tree so the post-processing passes
//! (highlighting, copy controls, math) can work on elements and text nodes
//! instead of raw strings, the way they would on a live document.

use scraper::{ElementRef, Html};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text content is emitted without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_text(out),
            Node::Text(t) => out.push_str(t),
        }
    }

    fn write_html(&self, out: &mut String, raw_text: bool) {
        match self {
            Node::Element(el) => el.write_html(out),
            Node::Text(t) if raw_text => out.push_str(t),
            Node::Text(t) => out.push_str(&escape_html(t)),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let remaining: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = remaining.join(" ");
        self.set_attr("class", joined);
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    /// Direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Direct child elements, mutably.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First descendant element with `tag` (document order, excluding self).
    pub fn find(&self, tag: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Collect references to all descendant elements with `tag`.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect(tag, &mut out);
        out
    }

    fn collect<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.tag == tag {
                out.push(child);
            }
            child.collect(tag, out);
        }
    }

    /// Visit every descendant element with `tag`, mutably, in document order.
    ///
    /// Matched elements are not searched further, so nested matches are
    /// skipped; `pre` never nests in rendered markdown.
    pub fn for_each_mut<F>(&mut self, tag: &str, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        for child in self.child_elements_mut() {
            if child.tag == tag {
                f(child);
            } else {
                child.for_each_mut(tag, f);
            }
        }
    }

    /// Serialize this element and its subtree.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Serialize only the children.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        let raw = RAW_TEXT_ELEMENTS.contains(&self.tag.as_str());
        for child in &self.children {
            child.write_html(&mut out, raw);
        }
        out
    }

    fn write_text(&self, out: &mut String) {
        for child in &self.children {
            child.write_text(out);
        }
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        out.push_str(&self.inner_html());
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Parse an HTML fragment into nodes.
///
/// Comments and doctypes are dropped.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let fragment = Html::parse_fragment(html);
    convert_children(fragment.root_element())
}

fn convert_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    Element {
        tag: value.name().to_string(),
        attrs: value
            .attrs()
            .map(|(name, v)| (name.to_string(), v.to_string()))
            .collect(),
        children: convert_children(element),
    }
}

fn convert_children(element: ElementRef<'_>) -> Vec<Node> {
    element
        .children()
        .filter_map(|child| {
            if let Some(el) = ElementRef::wrap(child) {
                return Some(Node::Element(convert_element(el)));
            }
            match child.value() {
                scraper::Node::Text(text) => Some(Node::Text(text.to_string())),
                _ => None,
            }
        })
        .collect()
}

/// Escape `& < > " '` for safe inclusion in HTML text or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
