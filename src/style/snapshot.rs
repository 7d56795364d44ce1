//! Resolved style snapshots and the resolver capability
//!
//! A [`StyleSnapshot`] is the cascade-final property/value set for one
//! element or pseudo-element, captured at one instant and never mutated
//! afterwards. [`StyleResolver`] is the seam between the cascade and its
//! consumers (preview renderer, clipboard export): production code resolves
//! through the real cascade, tests hand the export engine canned snapshots.

use crate::dom::NodeId;

// ─────────────────────────────────────────────────────────────────────────────
// Pseudo-Element Identity
// ─────────────────────────────────────────────────────────────────────────────

/// The two generated-content slots a skin rule can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoElement {
    Before,
    After,
}

// ─────────────────────────────────────────────────────────────────────────────
// StyleSnapshot
// ─────────────────────────────────────────────────────────────────────────────

/// An ordered property → resolved-value mapping for one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSnapshot {
    entries: Vec<(String, String)>,
}

impl StyleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from property/value pairs. Later pairs win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut snapshot = Self::new();
        for (name, value) in pairs {
            snapshot.set(&name.into(), value.into());
        }
        snapshot
    }

    /// Set a property, replacing any existing value.
    pub fn set(&mut self, name: &str, value: String) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    /// Read a property's resolved value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolver Capability
// ─────────────────────────────────────────────────────────────────────────────

/// Source of resolved styles for preview-tree nodes.
pub trait StyleResolver {
    /// Resolved style of an element. Unknown nodes resolve to an empty
    /// snapshot (everything suppressed/absent).
    fn resolve(&self, node: NodeId) -> StyleSnapshot;

    /// Resolved style of a `::before`/`::after` pseudo-element, or `None`
    /// when no skin rule targets that slot on this node.
    fn resolve_pseudo(&self, node: NodeId, pseudo: PseudoElement) -> Option<StyleSnapshot>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Support
// ─────────────────────────────────────────────────────────────────────────────

/// Canned per-node snapshots, for exercising the export engine without
/// running the cascade.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FakeStyles {
    elements: std::collections::HashMap<NodeId, StyleSnapshot>,
    pseudos: std::collections::HashMap<(NodeId, PseudoElement), StyleSnapshot>,
}

#[cfg(test)]
impl FakeStyles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, node: NodeId, pairs: &[(&str, &str)]) -> Self {
        self.elements
            .insert(node, StyleSnapshot::from_pairs(pairs.iter().copied()));
        self
    }

    pub fn with_pseudo(
        mut self,
        node: NodeId,
        pseudo: PseudoElement,
        pairs: &[(&str, &str)],
    ) -> Self {
        self.pseudos
            .insert((node, pseudo), StyleSnapshot::from_pairs(pairs.iter().copied()));
        self
    }
}

#[cfg(test)]
impl StyleResolver for FakeStyles {
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

    #[test]
    fn test_snapshot_set_and_get() {
        let mut snapshot = StyleSnapshot::new();
        snapshot.set("color", "red".to_string());
        snapshot.set("font-size", "15px".to_string());

        assert_eq!(snapshot.get("color"), Some("red"));
        assert_eq!(snapshot.get("font-size"), Some("15px"));
        assert_eq!(snapshot.get("display"), None);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_snapshot_set_replaces() {
        let mut snapshot = StyleSnapshot::new();
        snapshot.set("color", "red".to_string());
        snapshot.set("color", "blue".to_string());

        assert_eq!(snapshot.get("color"), Some("blue"));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_snapshot_from_pairs_later_wins() {
        let snapshot =
            StyleSnapshot::from_pairs([("color", "red"), ("margin-top", "10px"), ("color", "blue")]);
        assert_eq!(snapshot.get("color"), Some("blue"));
        assert_eq!(snapshot.get("margin-top"), Some("10px"));
    }

    #[test]
    fn test_snapshot_iteration_order() {
        let snapshot = StyleSnapshot::from_pairs([("b", "2"), ("a", "1")]);
        let names: Vec<&str> = snapshot.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = StyleSnapshot::new();
        assert!(snapshot.is_empty());
        assert!(!snapshot.contains("color"));
    }
}
