//! Style inlining for clipboard export
//!
//! Serializes a resolved style snapshot into the single `prop:value;...`
//! string carried by each exported element's `style` attribute. The paste
//! target (the WeChat article editor) strips stylesheets, classes and ids,
//! so the inlined string is the only styling that survives.
//!
//! Only the fixed allow-list in [`EXPORT_PROPERTIES`] is serialized, in
//! allow-list order, and default-ish value tokens are suppressed to keep
//! payloads small. Zero margin/padding is the exception: hosts that apply
//! their own default spacing must still be overridden to zero.

use crate::style::{is_suppressed_value, StyleSnapshot, EXPORT_PROPERTIES};

/// Serialize a snapshot into an inline style string.
pub fn inline_style(snapshot: &StyleSnapshot) -> String {
    inline_style_excluding(snapshot, &[])
}

/// Serialize a snapshot, skipping the named properties. Used for tags whose
/// export style forces its own values for those properties.
pub fn inline_style_excluding(snapshot: &StyleSnapshot, exclude: &[&str]) -> String {
    let mut out = String::new();
    for &name in EXPORT_PROPERTIES {
        if exclude.contains(&name) {
            continue;
        }
        let Some(value) = snapshot.get(name) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() || is_suppressed_value(name, value) {
            continue;
        }
        out.push_str(name);
        out.push(':');
        out.push_str(value);
        out.push(';');
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_serialize_in_allow_list_order() {
        let snapshot = StyleSnapshot::from_pairs([("color", "red"), ("font-size", "16px")]);
        // Insertion order was color-first; output follows the allow-list.
        assert_eq!(inline_style(&snapshot), "font-size:16px;color:red;");
    }

    #[test]
    fn test_default_tokens_suppressed() {
        let snapshot = StyleSnapshot::from_pairs([
            ("text-decoration", "none"),
            ("width", "auto"),
            ("letter-spacing", "normal"),
            ("background-color", "rgba(0,0,0,0)"),
            ("border-radius", "0px"),
        ]);
        assert_eq!(inline_style(&snapshot), "");
    }

    #[test]
    fn test_zero_margin_and_padding_retained() {
        let snapshot = StyleSnapshot::from_pairs([
            ("color", "red"),
            ("margin-top", "0px"),
            ("padding-left", "0px"),
        ]);
        assert_eq!(
            inline_style(&snapshot),
            "color:red;margin-top:0px;padding-left:0px;"
        );
    }

    #[test]
    fn test_zero_outside_spacing_suppressed() {
        let snapshot = StyleSnapshot::from_pairs([("text-indent", "0px"), ("color", "blue")]);
        assert_eq!(inline_style(&snapshot), "color:blue;");
    }

    #[test]
    fn test_opacity_one_is_not_a_suppressed_token() {
        // Only the exact listed tokens are suppressed; `1` is not one of them.
        let snapshot = StyleSnapshot::from_pairs([("opacity", "1")]);
        assert_eq!(inline_style(&snapshot), "opacity:1;");
    }

    #[test]
    fn test_auto_margin_suppressed() {
        // The zero exception covers `0px` only; `auto` margins are still
        // suppressed like any other listed token.
        let snapshot = StyleSnapshot::from_pairs([("margin-left", "auto")]);
        assert_eq!(inline_style(&snapshot), "");
    }

    #[test]
    fn test_unlisted_properties_omitted() {
        let snapshot = StyleSnapshot::from_pairs([
            ("content", "'★'"),
            ("cursor", "pointer"),
            ("z-index", "10"),
        ]);
        assert_eq!(inline_style(&snapshot), "");
    }

    #[test]
    fn test_empty_value_treated_as_omit() {
        let snapshot = StyleSnapshot::from_pairs([("color", "  "), ("font-size", "14px")]);
        assert_eq!(inline_style(&snapshot), "font-size:14px;");
    }

    #[test]
    fn test_exclusion_list_skips_named_properties() {
        let snapshot = StyleSnapshot::from_pairs([
            ("display", "inline"),
            ("visibility", "hidden"),
            ("color", "red"),
        ]);
        let style = inline_style_excluding(&snapshot, &["display", "visibility"]);
        assert_eq!(style, "color:red;");
    }

    #[test]
    fn test_empty_snapshot_serializes_empty() {
        assert_eq!(inline_style(&StyleSnapshot::new()), "");
    }
}
