//! Skin styling engine
//!
//! This module resolves the effective visual style of every node in the
//! preview tree: a CSS subset parser for skin stylesheets, a cascade
//! resolver (specificity, source order, inline `style` attributes,
//! inheritance), and the fixed property allow-list the clipboard export
//! serializes. Resolution is exposed through the [`StyleResolver`] trait so
//! the export engine can be driven by canned snapshots in tests.

mod cascade;
mod css;
mod properties;
mod snapshot;

pub use cascade::{CascadeResolver, ResolvedStyles};
pub use css::{Declaration, Rule, Selector, Specificity, Stylesheet};
pub use properties::{
    is_inherited_property, is_spacing_property, is_suppressed_value, EXPORT_PROPERTIES,
    SUPPRESSED_VALUES,
};
pub use snapshot::{PseudoElement, StyleResolver, StyleSnapshot};

#[cfg(test)]
pub use snapshot::FakeStyles;
