//! Arena-backed element/text tree parsed from rendered HTML
//!
//! The preview document is regenerated from the markdown source on every
//! content change. Raw inline HTML in the source survives the markdown
//! renderer (unsafe rendering is enabled) and lands here like any other
//! markup, so `<h1 style="color:red">` in an article flows through the
//! cascade and the export engine unchanged.

use ego_tree::NodeRef;
use scraper::node::Node as ScraperNode;
use scraper::{ElementRef, Html};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// The id carried by the synthetic container wrapping the rendered article.
/// Skin stylesheets target their rules at `#preview-root`.
pub const PREVIEW_ROOT_ID: &str = "preview-root";

/// Standard void elements: no children, no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Check whether a tag is a standard void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Types
// ─────────────────────────────────────────────────────────────────────────────

/// Index of a node within its owning [`DomTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// An element node: tag, attributes in document order, and child ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<NodeId>,
}

impl Element {
    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A node in the tree: either an element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// DomTree
// ─────────────────────────────────────────────────────────────────────────────

/// Arena of nodes with a single root element.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl DomTree {
    /// Create a tree containing only the synthetic preview-root container.
    pub fn new_preview_root() -> Self {
        Self::with_root(
            "div",
            vec![("id".to_string(), PREVIEW_ROOT_ID.to_string())],
        )
    }

    /// Create a tree whose root is an arbitrary childless element.
    pub fn with_root(tag: &str, attrs: Vec<(String, String)>) -> Self {
        let root_element = Element {
            tag: tag.to_string(),
            attrs,
            children: Vec::new(),
        };
        Self {
            nodes: vec![Node::Element(root_element)],
            root: NodeId(0),
        }
    }

    /// Parse an HTML fragment into a tree rooted at the preview container.
    ///
    /// Comments and other non-element, non-text content are skipped.
    pub fn from_html_fragment(html: &str) -> Self {
        let mut tree = Self::new_preview_root();
        let fragment = Html::parse_fragment(html);
        let root = fragment.root_element();
        let preview_root = tree.root;
        for child in root.children() {
            if let Some(id) = tree.convert_scraper_node(child) {
                tree.append_child(preview_root, id);
            }
        }
        tree
    }

    /// Convert one scraper node (and its subtree) into arena nodes.
    fn convert_scraper_node(&mut self, node: NodeRef<'_, ScraperNode>) -> Option<NodeId> {
        match node.value() {
            ScraperNode::Text(text) => Some(self.push_text(text.to_string())),
            ScraperNode::Element(_) => {
                let element = ElementRef::wrap(node)?;
                let tag = element.value().name().to_string();
                let attrs = element
                    .value()
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect();
                let id = self.push_element_with_attrs(tag, attrs);
                for child in node.children() {
                    if let Some(child_id) = self.convert_scraper_node(child) {
                        self.append_child(id, child_id);
                    }
                }
                Some(id)
            }
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a new childless element node.
    pub fn push_element(&mut self, tag: &str) -> NodeId {
        self.push_element_with_attrs(tag.to_string(), Vec::new())
    }

    /// Add a new childless element node with attributes.
    pub fn push_element_with_attrs(&mut self, tag: String, attrs: Vec<(String, String)>) -> NodeId {
        self.nodes.push(Node::Element(Element {
            tag,
            attrs,
            children: Vec::new(),
        }));
        NodeId(self.nodes.len() - 1)
    }

    /// Add a new text node.
    pub fn push_text(&mut self, text: String) -> NodeId {
        self.nodes.push(Node::Text(text));
        NodeId(self.nodes.len() - 1)
    }

    /// Append a child to a parent element. No-op if the parent is a text node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Node::Element(element) = &mut self.nodes[parent.0] {
            element.children.push(child);
        }
    }

    /// Set an attribute on an element, replacing any existing value.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: String) {
        if let Node::Element(element) = &mut self.nodes[id.0] {
            if let Some(slot) = element.attrs.iter_mut().find(|(n, _)| n == name) {
                slot.1 = value;
            } else {
                element.attrs.push((name.to_string(), value));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access
    // ─────────────────────────────────────────────────────────────────────────

    /// Root node id (always an element).
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Borrow a node as an element, if it is one.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0] {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Child ids of a node (empty for text nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0] {
            Node::Element(element) => &element.children,
            Node::Text(_) => &[],
        }
    }

    /// Attribute value on an element node.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    /// Concatenated text of a subtree, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0] {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Total number of nodes in the arena (including the root).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds nothing beyond the root container.
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Serialization
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialize a subtree back to HTML.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(id, &mut out);
        out
    }

    /// Serialize only the children of a node (the node's inner HTML).
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.serialize_node(*child, &mut out);
        }
        out
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0] {
            Node::Text(text) => escape_text(text, out),
            Node::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');

                if is_void_element(&element.tag) {
                    return;
                }

                for child in &element.children {
                    self.serialize_node(*child, out);
                }

                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// Escape text-node content.
fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

/// Escape an attribute value (double-quoted context).
fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_preview_root() {
        let tree = DomTree::new_preview_root();
        let root = tree.element(tree.root()).unwrap();
        assert_eq!(root.tag, "div");
        assert_eq!(root.attr("id"), Some(PREVIEW_ROOT_ID));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_parse_simple_fragment() {
        let tree = DomTree::from_html_fragment("<h1>Title</h1><p>Hello</p>");
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 2);

        let h1 = tree.element(children[0]).unwrap();
        assert_eq!(h1.tag, "h1");
        assert_eq!(tree.text_content(children[0]), "Title");

        let p = tree.element(children[1]).unwrap();
        assert_eq!(p.tag, "p");
        assert_eq!(tree.text_content(children[1]), "Hello");
    }

    #[test]
    fn test_parse_preserves_attributes() {
        let tree = DomTree::from_html_fragment(r#"<h1 style="color:red" class="big">T</h1>"#);
        let h1 = tree.children(tree.root())[0];
        assert_eq!(tree.attr(h1, "style"), Some("color:red"));
        assert_eq!(tree.attr(h1, "class"), Some("big"));
        assert_eq!(tree.attr(h1, "id"), None);
    }

    #[test]
    fn test_parse_nested_inline_markup() {
        let tree = DomTree::from_html_fragment("<p>Hello <strong>world</strong></p>");
        let p = tree.children(tree.root())[0];
        let p_children = tree.children(p);
        assert_eq!(p_children.len(), 2);
        assert!(matches!(tree.get(p_children[0]), Node::Text(t) if t == "Hello "));
        let strong = tree.element(p_children[1]).unwrap();
        assert_eq!(strong.tag, "strong");
        assert_eq!(tree.text_content(p_children[1]), "world");
    }

    #[test]
    fn test_parse_skips_comments() {
        let tree = DomTree::from_html_fragment("<p>a</p><!-- note --><p>b</p>");
        assert_eq!(tree.children(tree.root()).len(), 2);
    }

    #[test]
    fn test_void_element_classification() {
        assert!(is_void_element("img"));
        assert!(is_void_element("br"));
        assert!(is_void_element("hr"));
        assert!(!is_void_element("div"));
        assert!(!is_void_element("span"));
    }

    #[test]
    fn test_text_content_concatenates_subtree() {
        let tree = DomTree::from_html_fragment("<p>Hello <strong>world</strong>!</p>");
        assert_eq!(tree.text_content(tree.root()), "Hello world!");
    }

    #[test]
    fn test_serialize_roundtrip_structure() {
        let tree = DomTree::from_html_fragment("<p>Hello <strong>world</strong></p>");
        let html = tree.inner_html(tree.root());
        assert_eq!(html, "<p>Hello <strong>world</strong></p>");
    }

    #[test]
    fn test_serialize_void_element_has_no_closing_tag() {
        let tree = DomTree::from_html_fragment(r#"<img src="x.png"><br>"#);
        let html = tree.inner_html(tree.root());
        assert_eq!(html, r#"<img src="x.png"><br>"#);
    }

    #[test]
    fn test_serialize_escapes_text_and_attrs() {
        let mut tree = DomTree::new_preview_root();
        let p = tree.push_element("p");
        let text = tree.push_text("a < b & c".to_string());
        tree.append_child(p, text);
        tree.set_attr(p, "title", "say \"hi\" & go".to_string());
        let html = tree.to_html(p);
        assert_eq!(
            html,
            r#"<p title="say &quot;hi&quot; &amp; go">a &lt; b &amp; c</p>"#
        );
    }

    #[test]
    fn test_set_attr_replaces_existing() {
        let mut tree = DomTree::new_preview_root();
        let img = tree.push_element("img");
        tree.set_attr(img, "src", "a.png".to_string());
        tree.set_attr(img, "src", "b.png".to_string());
        let element = tree.element(img).unwrap();
        assert_eq!(element.attrs.len(), 1);
        assert_eq!(element.attr("src"), Some("b.png"));
    }

    #[test]
    fn test_sibling_order_preserved() {
        let tree =
            DomTree::from_html_fragment(r#"<h1>Title</h1><p>Hello</p><img src="x.png">"#);
        let children = tree.children(tree.root());
        let tags: Vec<&str> = children
            .iter()
            .map(|id| tree.element(*id).unwrap().tag.as_str())
            .collect();
        assert_eq!(tags, vec!["h1", "p", "img"]);
    }

    #[test]
    fn test_whitespace_text_nodes_survive() {
        let tree = DomTree::from_html_fragment("<p>a</p>\n<p>b</p>");
        // The newline between blocks is a real text node.
        assert_eq!(tree.children(tree.root()).len(), 3);
        assert_eq!(tree.text_content(tree.root()), "a\nb");
    }
}
