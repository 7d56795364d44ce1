//! Export property allow-list and value suppression rules
//!
//! The clipboard payload inlines only a fixed set of visual properties, in a
//! fixed serialization order, and drops values that match the paste host's
//! own defaults. The suppression token set is a compatibility surface tuned
//! against the WeChat editor backend: changing it changes what pasted
//! articles look like, so it is covered by regression tests.

// ─────────────────────────────────────────────────────────────────────────────
// Allow-List
// ─────────────────────────────────────────────────────────────────────────────

/// Visual properties captured into the clipboard payload, in the order they
/// are serialized into each `style` attribute.
pub const EXPORT_PROPERTIES: &[&str] = &[
    // Font family
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "line-height",
    "letter-spacing",
    // Text family
    "color",
    "text-align",
    "text-indent",
    "text-decoration",
    "text-transform",
    "vertical-align",
    "white-space",
    "word-break",
    "overflow-wrap",
    // Background family
    "background-color",
    "background-image",
    "opacity",
    // Spacing family
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    // Border family
    "border-top",
    "border-right",
    "border-bottom",
    "border-left",
    "border-radius",
    "box-shadow",
    // Sizing family
    "width",
    "max-width",
    "min-width",
    "height",
    // Display family
    "display",
    "visibility",
    // List family
    "list-style-type",
    "list-style-position",
];

// ─────────────────────────────────────────────────────────────────────────────
// Suppression Rules
// ─────────────────────────────────────────────────────────────────────────────

/// Values treated as no-op defaults and omitted from inlined styles.
pub const SUPPRESSED_VALUES: &[&str] = &["rgba(0,0,0,0)", "none", "auto", "normal", "0px"];

/// Spacing properties keep an explicit `0px` so paste hosts that apply
/// non-zero default margins are still overridden to zero.
pub fn is_spacing_property(name: &str) -> bool {
    name.contains("margin") || name.contains("padding")
}

/// Decide whether a resolved value is omitted from the inlined style string.
pub fn is_suppressed_value(name: &str, value: &str) -> bool {
    if !SUPPRESSED_VALUES.contains(&value) {
        return false;
    }
    // The exception covers only the zero length, not none/auto/normal.
    !(value == "0px" && is_spacing_property(name))
}

// ─────────────────────────────────────────────────────────────────────────────
// Inheritance
// ─────────────────────────────────────────────────────────────────────────────

/// Properties that flow from parent to child when not set locally.
const INHERITED_PROPERTIES: &[&str] = &[
    "color",
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "line-height",
    "letter-spacing",
    "text-align",
    "text-indent",
    "text-transform",
    "white-space",
    "word-break",
    "overflow-wrap",
    "visibility",
    "list-style-type",
    "list-style-position",
];

/// Check whether a property inherits through the cascade.
pub fn is_inherited_property(name: &str) -> bool {
    INHERITED_PROPERTIES.contains(&name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
