//! Pseudo-element materialization for clipboard export
//!
//! Skins decorate headings and other blocks through `::before`/`::after`
//! generated content. The paste target only keeps real nodes, so a visible
//! pseudo-element must become an actual `<span>` in the exported tree,
//! carrying the pseudo-element's inlined style and its literal text.
//!
//! Only quoted string literals produce a node. `none`, `normal`, the empty
//! literal, and the functional forms (`counter()`, `attr()`, `url()`,
//! keywords like `open-quote`) all yield nothing, silently, never an error.

use crate::dom::{DomTree, NodeId};
use crate::export::inline::inline_style;
use crate::style::StyleSnapshot;

/// Build a synthetic span for a pseudo-element snapshot, if its `content`
/// resolves to visible text. The span is created inside `out` but not
/// attached to any parent.
pub fn materialize_pseudo(out: &mut DomTree, snapshot: &StyleSnapshot) -> Option<NodeId> {
    let text = visible_content(snapshot)?;

    let span = out.push_element("span");
    let style = inline_style(snapshot);
    if !style.is_empty() {
        out.set_attr(span, "style", style);
    }
    let text_node = out.push_text(text);
    out.append_child(span, text_node);
    Some(span)
}

/// The visible text a pseudo-element snapshot contributes, if any. The
/// preview renderer uses the same decision as the exporter, so what the user
/// sees is exactly what gets copied.
pub fn visible_content(snapshot: &StyleSnapshot) -> Option<String> {
    literal_text(snapshot.get("content")?)
}

/// Extract the text of a `content` value when it is a quoted string literal
/// with visible content. Everything else yields `None`.
fn literal_text(content: &str) -> Option<String> {
    let content = content.trim();
    if content.is_empty() || content == "none" || content == "normal" {
        return None;
    }

    let bytes = content.as_bytes();
    let first = *bytes.first()?;
    let last = *bytes.last()?;
    let quoted = content.len() >= 2
        && ((first == b'\'' && last == b'\'') || (first == b'"' && last == b'"'));
    if !quoted {
        return None;
    }

    let inner = &content[1..content.len() - 1];
    if inner.is_empty() {
        return None;
    }
    Some(inner.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn materialize(pairs: &[(&str, &str)]) -> (DomTree, Option<NodeId>) {
        let mut out = DomTree::new_preview_root();
        let snapshot = StyleSnapshot::from_pairs(pairs.iter().copied());
        let span = materialize_pseudo(&mut out, &snapshot);
        (out, span)
    }

    #[test]
    fn test_string_literal_creates_span_with_text() {
        let (out, span) = materialize(&[("content", "'★'")]);
        let span = span.unwrap();
        let element = out.element(span).unwrap();
        assert_eq!(element.tag, "span");
        assert_eq!(out.text_content(span), "★");
        assert_eq!(out.children(span).len(), 1);
    }

    #[test]
    fn test_double_quoted_literal_supported() {
        let (out, span) = materialize(&[("content", "\"→\"")]);
        assert_eq!(out.text_content(span.unwrap()), "→");
    }

    #[test]
    fn test_absent_content_yields_nothing() {
        let (_, span) = materialize(&[("color", "red")]);
        assert!(span.is_none());
    }

    #[test]
    fn test_none_and_normal_yield_nothing() {
        assert!(materialize(&[("content", "none")]).1.is_none());
        assert!(materialize(&[("content", "normal")]).1.is_none());
    }

    #[test]
    fn test_empty_literal_yields_nothing() {
        assert!(materialize(&[("content", "''")]).1.is_none());
        assert!(materialize(&[("content", "\"\"")]).1.is_none());
    }

    #[test]
    fn test_functional_content_forms_yield_nothing() {
        assert!(materialize(&[("content", "counter(item)")]).1.is_none());
        assert!(materialize(&[("content", "attr(href)")]).1.is_none());
        assert!(materialize(&[("content", "url(icon.png)")]).1.is_none());
        assert!(materialize(&[("content", "open-quote")]).1.is_none());
    }

    #[test]
    fn test_span_carries_inlined_pseudo_style() {
        let (out, span) = materialize(&[
            ("content", "'#'"),
            ("color", "teal"),
            ("margin-right", "8px"),
        ]);
        let span = span.unwrap();
        // `content` itself is not an allow-listed property.
        assert_eq!(out.attr(span, "style"), Some("color:teal;margin-right:8px;"));
    }

    #[test]
    fn test_content_only_span_has_no_style_attribute() {
        let (out, span) = materialize(&[("content", "'x'")]);
        assert_eq!(out.attr(span.unwrap(), "style"), None);
    }

    #[test]
    fn test_span_is_detached_until_appended() {
        let (out, span) = materialize(&[("content", "'x'")]);
        let span = span.unwrap();
        assert!(matches!(out.get(span), Node::Element(_)));
        assert!(!out.children(out.root()).contains(&span));
    }

    #[test]
    fn test_multibyte_literal_preserved() {
        let (out, span) = materialize(&[("content", "'🌸'")]);
        assert_eq!(out.text_content(span.unwrap()), "🌸");
    }
}
