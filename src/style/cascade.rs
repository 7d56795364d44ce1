//! Style cascade over the preview tree
//!
//! Resolves every element of a [`DomTree`] against a parsed skin stylesheet
//! plus any inline `style` attributes carried by the markup. The outcome is a
//! [`ResolvedStyles`] table, the single style source both the preview
//! renderer and the export engine consume.
//!
//! Cascade order per declaration: (importance, specificity, source order),
//! applied ascending so the strongest declaration lands last. Inline styles
//! sort above every selector at equal importance. Inherited properties seed a
//! child's snapshot from its parent before any rule applies, so a direct
//! declaration always overrides an inherited value.

use std::collections::HashMap;

use crate::dom::{DomTree, Node, NodeId};
use crate::style::css::{parse_declaration_block, Specificity, Stylesheet};
use crate::style::properties::is_inherited_property;
use crate::style::snapshot::{PseudoElement, StyleResolver, StyleSnapshot};

/// Sort rank for inline `style` attributes: above any selector specificity.
const INLINE_SPECIFICITY: Specificity = Specificity(u32::MAX, u32::MAX, u32::MAX);

// ─────────────────────────────────────────────────────────────────────────────
// CascadeResolver
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves computed styles for a tree under one skin stylesheet.
pub struct CascadeResolver {
    stylesheet: Stylesheet,
}

impl CascadeResolver {
    /// Build a resolver from skin CSS text.
    pub fn new(skin_css: &str) -> Self {
        Self {
            stylesheet: Stylesheet::parse(skin_css),
        }
    }

    /// Resolve every element (and generated-content slot) in the tree.
    pub fn resolve_tree(&self, tree: &DomTree) -> ResolvedStyles {
        let mut resolved = ResolvedStyles::default();
        let mut ancestors = Vec::new();
        self.resolve_node(tree, tree.root(), &mut ancestors, None, &mut resolved);
        resolved
    }

    fn resolve_node(
        &self,
        tree: &DomTree,
        node: NodeId,
        ancestors: &mut Vec<NodeId>,
        parent_snapshot: Option<&StyleSnapshot>,
        out: &mut ResolvedStyles,
    ) {
        if !matches!(tree.get(node), Node::Element(_)) {
            return;
        }

        let snapshot = self.resolve_element(tree, ancestors, node, parent_snapshot);
        self.resolve_pseudo_slots(tree, ancestors, node, &snapshot, out);

        ancestors.push(node);
        for child in tree.children(node) {
            self.resolve_node(tree, *child, ancestors, Some(&snapshot), out);
        }
        ancestors.pop();

        out.elements.insert(node, snapshot);
    }

    /// Compute one element's snapshot: inherited seed, then the cascade.
    fn resolve_element(
        &self,
        tree: &DomTree,
        ancestors: &[NodeId],
        node: NodeId,
        parent_snapshot: Option<&StyleSnapshot>,
    ) -> StyleSnapshot {
        let mut snapshot = StyleSnapshot::new();
        if let Some(parent) = parent_snapshot {
            for (name, value) in parent.iter() {
                if is_inherited_property(name) {
                    snapshot.set(name, value.to_string());
                }
            }
        }

        let mut candidates = Vec::new();
        for rule in &self.stylesheet.rules {
            if rule.selector.pseudo.is_some() {
                continue;
            }
            if rule.selector.matches(tree, ancestors, node) {
                let specificity = rule.selector.specificity();
                for declaration in &rule.declarations {
                    candidates.push(Candidate {
                        important: declaration.important,
                        specificity,
                        source_order: rule.source_order,
                        name: &declaration.name,
                        value: &declaration.value,
                    });
                }
            }
        }

        let inline_declarations = tree
            .attr(node, "style")
            .map(parse_declaration_block)
            .unwrap_or_default();
        for declaration in &inline_declarations {
            candidates.push(Candidate {
                important: declaration.important,
                specificity: INLINE_SPECIFICITY,
                source_order: u32::MAX,
                name: &declaration.name,
                value: &declaration.value,
            });
        }

        apply_sorted(candidates, &mut snapshot);
        snapshot
    }

    /// Compute `::before`/`::after` snapshots where the skin declares them.
    fn resolve_pseudo_slots(
        &self,
        tree: &DomTree,
        ancestors: &[NodeId],
        node: NodeId,
        element_snapshot: &StyleSnapshot,
        out: &mut ResolvedStyles,
    ) {
        for slot in [PseudoElement::Before, PseudoElement::After] {
            let mut candidates = Vec::new();
            for rule in &self.stylesheet.rules {
                if rule.selector.pseudo != Some(slot) {
                    continue;
                }
                if rule.selector.matches(tree, ancestors, node) {
                    let specificity = rule.selector.specificity();
                    for declaration in &rule.declarations {
                        candidates.push(Candidate {
                            important: declaration.important,
                            specificity,
                            source_order: rule.source_order,
                            name: &declaration.name,
                            value: &declaration.value,
                        });
                    }
                }
            }
            if candidates.is_empty() {
                continue;
            }

            // Generated content inherits from its originating element.
            let mut snapshot = StyleSnapshot::new();
            for (name, value) in element_snapshot.iter() {
                if is_inherited_property(name) {
                    snapshot.set(name, value.to_string());
                }
            }
            apply_sorted(candidates, &mut snapshot);
            out.pseudos.insert((node, slot), snapshot);
        }
    }
}

/// One declaration in cascade position.
struct Candidate<'a> {
    important: bool,
    specificity: Specificity,
    source_order: u32,
    name: &'a str,
    value: &'a str,
}

/// Sort ascending by cascade rank and apply in order, so the strongest
/// declaration writes last.
fn apply_sorted(mut candidates: Vec<Candidate<'_>>, snapshot: &mut StyleSnapshot) {
    candidates.sort_by_key(|c| (c.important, c.specificity, c.source_order));
    for candidate in candidates {
        snapshot.set(candidate.name, candidate.value.to_string());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResolvedStyles
// ─────────────────────────────────────────────────────────────────────────────

/// Computed snapshots for every element and generated-content slot of one
/// resolved tree.
#[derive(Debug, Clone, Default)]
pub struct ResolvedStyles {
    elements: HashMap<NodeId, StyleSnapshot>,
    pseudos: HashMap<(NodeId, PseudoElement), StyleSnapshot>,
}

impl ResolvedStyles {
    /// Number of resolved elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when nothing has been resolved.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl StyleResolver for ResolvedStyles {
    fn resolve(&self, node: NodeId) -> StyleSnapshot {
        self.elements.get(&node).cloned().unwrap_or_default()
    }

    fn resolve_pseudo(&self, node: NodeId, pseudo: PseudoElement) -> Option<StyleSnapshot> {
        self.pseudos.get(&(node, pseudo)).cloned()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(skin: &str, html: &str) -> (DomTree, ResolvedStyles) {
        let tree = DomTree::from_html_fragment(html);
        let styles = CascadeResolver::new(skin).resolve_tree(&tree);
        (tree, styles)
    }

    #[test]
    fn test_scoped_tag_rule_applies() {
        let (tree, styles) = resolve("#preview-root p { color: red; }", "<p>x</p>");
        let p = tree.children(tree.root())[0];
        assert_eq!(styles.resolve(p).get("color"), Some("red"));
    }

    #[test]
    fn test_specificity_beats_source_order() {
        let (tree, styles) = resolve(
            "#preview-root p { color: red; } p { color: blue; }",
            "<p>x</p>",
        );
        let p = tree.children(tree.root())[0];
        assert_eq!(styles.resolve(p).get("color"), Some("red"));
    }

    #[test]
    fn test_source_order_breaks_ties() {
        let (tree, styles) = resolve("p { color: blue; } p { color: red; }", "<p>x</p>");
        let p = tree.children(tree.root())[0];
        assert_eq!(styles.resolve(p).get("color"), Some("red"));
    }

    #[test]
    fn test_inline_style_beats_stylesheet() {
        let (tree, styles) = resolve(
            "#preview-root p { color: red; }",
            r#"<p style="color: green">x</p>"#,
        );
        let p = tree.children(tree.root())[0];
        assert_eq!(styles.resolve(p).get("color"), Some("green"));
    }

    #[test]
    fn test_important_beats_inline_style() {
        let (tree, styles) = resolve(
            "p { color: red !important; }",
            r#"<p style="color: green">x</p>"#,
        );
        let p = tree.children(tree.root())[0];
        assert_eq!(styles.resolve(p).get("color"), Some("red"));
    }

    #[test]
    fn test_inherited_properties_flow_down() {
        let (tree, styles) = resolve(
            "#preview-root { color: #333; font-family: serif; }",
            "<p>Hello <strong>world</strong></p>",
        );
        let p = tree.children(tree.root())[0];
        let strong = tree.children(p)[1];

        let p_style = styles.resolve(p);
        assert_eq!(p_style.get("color"), Some("#333"));
        assert_eq!(p_style.get("font-family"), Some("serif"));
        // Inheritance crosses more than one level.
        assert_eq!(styles.resolve(strong).get("color"), Some("#333"));
    }

    #[test]
    fn test_non_inherited_properties_stay_put() {
        let (tree, styles) = resolve("#preview-root { padding: 20px; }", "<p>x</p>");
        let root_style = styles.resolve(tree.root());
        assert_eq!(root_style.get("padding-top"), Some("20px"));

        let p = tree.children(tree.root())[0];
        assert_eq!(styles.resolve(p).get("padding-top"), None);
    }

    #[test]
    fn test_direct_rule_overrides_inherited_value() {
        let (tree, styles) = resolve(
            "#preview-root { color: #333; } #preview-root p { color: red; }",
            "<p>x</p>",
        );
        let p = tree.children(tree.root())[0];
        assert_eq!(styles.resolve(p).get("color"), Some("red"));
    }

    #[test]
    fn test_margin_shorthand_reaches_snapshot() {
        let (tree, styles) = resolve("#preview-root p { margin: 8px 0; }", "<p>x</p>");
        let p = tree.children(tree.root())[0];
        let style = styles.resolve(p);
        assert_eq!(style.get("margin-top"), Some("8px"));
        assert_eq!(style.get("margin-left"), Some("0px"));
    }

    #[test]
    fn test_pseudo_snapshot_resolved_for_matching_slot() {
        let (tree, styles) = resolve(
            "#preview-root h2::before { content: '🌸'; margin-right: 8px; }",
            "<h2>Title</h2><p>x</p>",
        );
        let h2 = tree.children(tree.root())[0];
        let p = tree.children(tree.root())[1];

        let before = styles.resolve_pseudo(h2, PseudoElement::Before).unwrap();
        assert_eq!(before.get("content"), Some("'🌸'"));
        assert_eq!(before.get("margin-right"), Some("8px"));

        assert!(styles.resolve_pseudo(h2, PseudoElement::After).is_none());
        assert!(styles.resolve_pseudo(p, PseudoElement::Before).is_none());
    }

    #[test]
    fn test_pseudo_inherits_from_originating_element() {
        let (tree, styles) = resolve(
            "#preview-root h2 { color: teal; } #preview-root h2::before { content: '#'; }",
            "<h2>Title</h2>",
        );
        let h2 = tree.children(tree.root())[0];
        let before = styles.resolve_pseudo(h2, PseudoElement::Before).unwrap();
        assert_eq!(before.get("color"), Some("teal"));
    }

    #[test]
    fn test_unstyled_element_resolves_empty() {
        let (tree, styles) = resolve("", "<p>x</p>");
        let p = tree.children(tree.root())[0];
        assert!(styles.resolve(p).is_empty());
    }
}
