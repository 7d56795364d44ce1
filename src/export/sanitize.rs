//! Sanitizing clone of the preview tree
//!
//! Walks the rendered preview tree depth-first and builds the export copy:
//! every element re-emitted with its resolved style inlined, identity
//! attributes stripped, pseudo-elements materialized as real spans, and
//! tag-specific overrides applied so images and lists survive the paste
//! target's own stylesheet. The source tree is never mutated.

use crate::dom::{is_void_element, DomTree, Node, NodeId};
use crate::export::inline::{inline_style, inline_style_excluding};
use crate::export::pseudo::materialize_pseudo;
use crate::style::{PseudoElement, StyleResolver, StyleSnapshot};

// ─────────────────────────────────────────────────────────────────────────────
// Tag Overrides
// ─────────────────────────────────────────────────────────────────────────────

/// Properties whose resolved values are discarded on `<img>` in favor of the
/// forced responsive sizing below.
const IMG_FORCED_PROPS: &[&str] = &["max-width", "height", "display", "visibility"];

/// Forced `<img>` sizing: scale to the host column, never hidden.
const IMG_FORCED_STYLE: &str = "max-width:100%;height:auto;display:block;visibility:visible;";

/// Centering fallback for images that carry no margin of their own.
const IMG_CENTERING_STYLE: &str = "margin:10px auto;";

/// Properties whose resolved values are discarded on `<ul>`/`<ol>` in favor
/// of the forced reset below.
const LIST_FORCED_PROPS: &[&str] = &["list-style-position", "margin-left", "padding-left"];

/// Forced list reset: markers rendered inside the item box so they survive
/// hosts that strip list styling.
const LIST_FORCED_STYLE: &str = "list-style-position:inside;margin-left:0;padding-left:20px;";

/// Attributes that never survive sanitization. The inlined style replaces
/// any authored `style` attribute wholesale.
fn is_stripped_attr(name: &str) -> bool {
    name == "id" || name == "class" || name == "style" || name.starts_with("data-")
}

// ─────────────────────────────────────────────────────────────────────────────
// DomSanitizingCloner
// ─────────────────────────────────────────────────────────────────────────────

/// Clones a preview subtree into an export tree, sanitized and inlined.
pub struct DomSanitizingCloner<'a, R: StyleResolver> {
    source: &'a DomTree,
    resolver: &'a R,
}

impl<'a, R: StyleResolver> DomSanitizingCloner<'a, R> {
    pub fn new(source: &'a DomTree, resolver: &'a R) -> Self {
        Self { source, resolver }
    }

    /// Clone one subtree into `out`, returning the new root's id. The clone
    /// is created detached; the caller decides where to attach it.
    pub fn clone_subtree(&self, out: &mut DomTree, node: NodeId) -> NodeId {
        self.clone_node(out, node)
    }

    /// Clone every child of `source_parent` into `out` under `out_parent`,
    /// preserving sibling order.
    pub fn clone_children_into(
        &self,
        out: &mut DomTree,
        source_parent: NodeId,
        out_parent: NodeId,
    ) {
        for child in self.source.children(source_parent) {
            let clone = self.clone_node(out, *child);
            out.append_child(out_parent, clone);
        }
    }

    fn clone_node(&self, out: &mut DomTree, node: NodeId) -> NodeId {
        let element = match self.source.get(node) {
            // Text is copied verbatim, no style processing.
            Node::Text(text) => return out.push_text(text.clone()),
            Node::Element(element) => element,
        };

        let snapshot = self.resolver.resolve(node);

        // Shallow clone: tag plus structural attributes only.
        let attrs: Vec<(String, String)> = element
            .attrs
            .iter()
            .filter(|(name, _)| !is_stripped_attr(name))
            .cloned()
            .collect();
        let clone = out.push_element_with_attrs(element.tag.clone(), attrs);

        let style = element_style(&element.tag, &snapshot);
        if !style.is_empty() {
            out.set_attr(clone, "style", style);
        }

        // Void elements carry no children and no generated content.
        if is_void_element(&element.tag) {
            return clone;
        }

        if let Some(before) = self.resolver.resolve_pseudo(node, PseudoElement::Before) {
            if let Some(span) = materialize_pseudo(out, &before) {
                out.append_child(clone, span);
            }
        }

        self.clone_children_into(out, node, clone);

        if let Some(after) = self.resolver.resolve_pseudo(node, PseudoElement::After) {
            if let Some(span) = materialize_pseudo(out, &after) {
                out.append_child(clone, span);
            }
        }

        clone
    }
}

/// Build an element's inline style string, applying tag-specific overrides.
fn element_style(tag: &str, snapshot: &StyleSnapshot) -> String {
    match tag {
        "img" => {
            let mut style = inline_style_excluding(snapshot, IMG_FORCED_PROPS);
            style.push_str(IMG_FORCED_STYLE);
            if !style.contains("margin") {
                style.push_str(IMG_CENTERING_STYLE);
            }
            style
        }
        "ul" | "ol" => {
            let mut style = inline_style_excluding(snapshot, LIST_FORCED_PROPS);
            style.push_str(LIST_FORCED_STYLE);
            style
        }
        _ => inline_style(snapshot),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FakeStyles;

    fn clone_tree<R: StyleResolver>(source: &DomTree, resolver: &R) -> DomTree {
        let mut out = DomTree::new_preview_root();
        let cloner = DomSanitizingCloner::new(source, resolver);
        let out_root = out.root();
        cloner.clone_children_into(&mut out, source.root(), out_root);
        out
    }

    #[test]
    fn test_text_nodes_copied_verbatim() {
        let source = DomTree::from_html_fragment("<p>Hello &amp; goodbye</p>");
        let out = clone_tree(&source, &FakeStyles::new());
        assert_eq!(out.text_content(out.root()), "Hello & goodbye");
    }

    #[test]
    fn test_identity_attributes_stripped() {
        let source = DomTree::from_html_fragment(
            r#"<h1 id="t" class="big" data-line="3" title="keep">Title</h1>"#,
        );
        let out = clone_tree(&source, &FakeStyles::new());
        let h1 = out.children(out.root())[0];
        assert_eq!(out.attr(h1, "id"), None);
        assert_eq!(out.attr(h1, "class"), None);
        assert_eq!(out.attr(h1, "data-line"), None);
        assert_eq!(out.attr(h1, "title"), Some("keep"));
    }

    #[test]
    fn test_authored_style_replaced_by_resolved_style() {
        let source = DomTree::from_html_fragment(r#"<p style="color: green">x</p>"#);
        let p = source.children(source.root())[0];
        let styles = FakeStyles::new().with_style(p, &[("color", "red")]);
        let out = clone_tree(&source, &styles);
        let clone = out.children(out.root())[0];
        assert_eq!(out.attr(clone, "style"), Some("color:red;"));
    }

    #[test]
    fn test_unstyled_element_has_no_style_attribute() {
        let source = DomTree::from_html_fragment("<p>x</p>");
        let out = clone_tree(&source, &FakeStyles::new());
        let p = out.children(out.root())[0];
        assert_eq!(out.attr(p, "style"), None);
    }

    #[test]
    fn test_img_forced_sizing_and_centering() {
        let source = DomTree::from_html_fragment(r#"<img src="x.png">"#);
        let out = clone_tree(&source, &FakeStyles::new());
        let img = out.children(out.root())[0];
        assert_eq!(
            out.attr(img, "style"),
            Some("max-width:100%;height:auto;display:block;visibility:visible;margin:10px auto;")
        );
        assert_eq!(out.attr(img, "src"), Some("x.png"));
    }

    #[test]
    fn test_img_forced_sizing_overrides_resolved_style() {
        let source = DomTree::from_html_fragment(r#"<img src="x.png">"#);
        let img = source.children(source.root())[0];
        let styles = FakeStyles::new().with_style(
            img,
            &[("display", "none"), ("visibility", "hidden"), ("height", "50px")],
        );
        let out = clone_tree(&source, &styles);
        let clone = out.children(out.root())[0];
        let style = out.attr(clone, "style").unwrap();
        assert!(style.contains("display:block;"));
        assert!(style.contains("max-width:100%;"));
        assert!(style.contains("visibility:visible;"));
        assert!(!style.contains("display:none"));
        assert!(!style.contains("height:50px"));
        assert!(out.children(clone).is_empty());
    }

    #[test]
    fn test_img_with_own_margin_keeps_it() {
        let source = DomTree::from_html_fragment(r#"<img src="x.png">"#);
        let img = source.children(source.root())[0];
        let styles = FakeStyles::new().with_style(img, &[("margin-bottom", "24px")]);
        let out = clone_tree(&source, &styles);
        let style = out.attr(out.children(out.root())[0], "style").unwrap();
        assert!(style.contains("margin-bottom:24px;"));
        assert!(!style.contains("margin:10px auto;"));
    }

    #[test]
    fn test_list_containers_forced_reset() {
        let source = DomTree::from_html_fragment("<ul><li>a</li></ul><ol><li>b</li></ol>");
        let ul = source.children(source.root())[0];
        let styles = FakeStyles::new().with_style(
            ul,
            &[("margin-left", "40px"), ("padding-left", "2em"), ("color", "#333")],
        );
        let out = clone_tree(&source, &styles);

        let ul_clone = out.children(out.root())[0];
        assert_eq!(
            out.attr(ul_clone, "style"),
            Some("color:#333;list-style-position:inside;margin-left:0;padding-left:20px;")
        );
        let ol_clone = out.children(out.root())[1];
        assert_eq!(
            out.attr(ol_clone, "style"),
            Some("list-style-position:inside;margin-left:0;padding-left:20px;")
        );
    }

    #[test]
    fn test_void_elements_have_no_children_or_pseudos() {
        let source = DomTree::from_html_fragment("<hr>");
        let hr = source.children(source.root())[0];
        // A slot rule on a void element must be ignored.
        let styles =
            FakeStyles::new().with_pseudo(hr, PseudoElement::Before, &[("content", "'x'")]);
        let out = clone_tree(&source, &styles);
        let clone = out.children(out.root())[0];
        assert!(out.children(clone).is_empty());
    }

    #[test]
    fn test_before_pseudo_appended_first_after_appended_last() {
        let source = DomTree::from_html_fragment("<h2>Title</h2>");
        let h2 = source.children(source.root())[0];
        let styles = FakeStyles::new()
            .with_pseudo(h2, PseudoElement::Before, &[("content", "'→'")])
            .with_pseudo(h2, PseudoElement::After, &[("content", "'←'")]);
        let out = clone_tree(&source, &styles);

        let clone = out.children(out.root())[0];
        let children = out.children(clone);
        assert_eq!(children.len(), 3);
        assert_eq!(out.text_content(children[0]), "→");
        assert_eq!(out.text_content(children[1]), "Title");
        assert_eq!(out.text_content(children[2]), "←");
    }

    #[test]
    fn test_suppressed_pseudo_content_yields_no_span() {
        let source = DomTree::from_html_fragment("<h2>Title</h2>");
        let h2 = source.children(source.root())[0];
        let styles =
            FakeStyles::new().with_pseudo(h2, PseudoElement::Before, &[("content", "none")]);
        let out = clone_tree(&source, &styles);
        let clone = out.children(out.root())[0];
        assert_eq!(out.children(clone).len(), 1);
        assert_eq!(out.text_content(clone), "Title");
    }

    #[test]
    fn test_sibling_order_preserved_through_clone() {
        let source = DomTree::from_html_fragment(
            r#"<h1>Title</h1><p>Hello <strong>world</strong></p><img src="x.png">"#,
        );
        let out = clone_tree(&source, &FakeStyles::new());
        let tags: Vec<String> = out
            .children(out.root())
            .iter()
            .map(|id| out.element(*id).unwrap().tag.clone())
            .collect();
        assert_eq!(tags, vec!["h1", "p", "img"]);
        assert_eq!(out.text_content(out.root()), "TitleHello world");
    }

    #[test]
    fn test_clone_is_deterministic() {
        let source = DomTree::from_html_fragment(
            r#"<h2>Title</h2><ul><li>a</li><li>b</li></ul><img src="x.png">"#,
        );
        let h2 = source.children(source.root())[0];
        let styles = FakeStyles::new()
            .with_style(h2, &[("color", "teal"), ("margin-top", "0px")])
            .with_pseudo(h2, PseudoElement::Before, &[("content", "'#'")]);

        let first = clone_tree(&source, &styles);
        let second = clone_tree(&source, &styles);
        assert_eq!(
            first.inner_html(first.root()),
            second.inner_html(second.root())
        );
    }

    #[test]
    fn test_source_tree_not_mutated() {
        let source = DomTree::from_html_fragment(r#"<p id="keep" style="color: green">x</p>"#);
        let before = source.inner_html(source.root());
        let _ = clone_tree(&source, &FakeStyles::new());
        assert_eq!(source.inner_html(source.root()), before);
    }
}
