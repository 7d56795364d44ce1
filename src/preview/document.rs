//! Rendered preview document
//!
//! One [`PreviewDocument`] is the fully materialized pipeline output for a
//! given (markdown, skin) pair: the parsed preview tree plus the resolved
//! style of every node in it. The app rebuilds it when either input
//! changes; the preview pane and the clipboard exporter both read from the
//! same instance, which is what keeps "what you see" and "what you copy"
//! identical.

use crate::dom::DomTree;
use crate::markdown::render_markdown;
use crate::style::{CascadeResolver, ResolvedStyles};

use super::PreviewRenderer;

/// The preview tree and its resolved styles for one markdown source.
pub struct PreviewDocument {
    pub tree: DomTree,
    pub styles: ResolvedStyles,
}

impl PreviewDocument {
    /// Render markdown under a skin stylesheet into a resolved document.
    pub fn build(markdown: &str, skin_css: &str) -> Self {
        let html = render_markdown(markdown);
        let tree = DomTree::from_html_fragment(&html);
        let styles = CascadeResolver::new(skin_css).resolve_tree(&tree);
        Self { tree, styles }
    }

    /// A renderer borrowing this document's tree and styles.
    pub fn renderer(&self) -> PreviewRenderer<'_> {
        PreviewRenderer::new(&self.tree, &self.styles)
    }

    /// True when the article has no visible text at all.
    pub fn is_blank(&self) -> bool {
        self.tree.text_content(self.tree.root()).trim().is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;
    use crate::style::StyleResolver;

    const SKIN: &str = "#preview-root { padding: 20px; }\n\
                        #preview-root h1 { color: #ff0000; }";

    #[test]
    fn test_build_resolves_styles_for_rendered_nodes() {
        let doc = PreviewDocument::build("# Title\n\nBody text.", SKIN);

        // Block elements, ignoring the renderer's whitespace text nodes.
        let children = doc.tree.children(doc.tree.root());
        let tags: Vec<&str> = children
            .iter()
            .filter_map(|c| doc.tree.element(*c))
            .map(|e| e.tag.as_str())
            .collect();
        assert_eq!(tags, ["h1", "p"]);

        let h1 = children[0];
        assert_eq!(doc.tree.element(h1).unwrap().tag, "h1");
        assert_eq!(doc.styles.resolve(h1).get("color"), Some("#ff0000"));

        let root_style = doc.styles.resolve(doc.tree.root());
        assert_eq!(root_style.get("padding-top"), Some("20px"));
    }

    #[test]
    fn test_build_keeps_text_verbatim() {
        let doc = PreviewDocument::build("Hello **world**", "");
        let p = doc.tree.children(doc.tree.root())[0];
        let strong = doc.tree.children(p)[1];
        match doc.tree.get(doc.tree.children(strong)[0]) {
            Node::Text(text) => assert_eq!(text, "world"),
            Node::Element(_) => panic!("expected text node"),
        }
    }

    #[test]
    fn test_blank_detection() {
        assert!(PreviewDocument::build("", SKIN).is_blank());
        assert!(PreviewDocument::build("   \n\n  ", SKIN).is_blank());
        assert!(!PreviewDocument::build("x", SKIN).is_blank());
    }
}
