//! Skin stylesheet parser
//!
//! Parses the CSS dialect skins are written in: plain rule sets with
//! comma-separated selector groups, simple selectors (`#id`, `.class`,
//! `tag`, `*`, compounds thereof) joined by descendant combinators, and an
//! optional `::before`/`::after` suffix on the subject. Anything outside the
//! dialect (at-rules, child/sibling combinators, malformed fragments) is
//! skipped with a debug log, never a parse failure. A skin that is half
//! garbage still applies its valid half.

use crate::dom::{DomTree, Element, NodeId};
use crate::style::properties::is_spacing_property;
use crate::style::snapshot::PseudoElement;
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Data Types
// ─────────────────────────────────────────────────────────────────────────────

/// A parsed stylesheet: flat rule list in source order.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

/// One selector with its declaration block. Comma groups are split into
/// separate rules sharing the declarations.
#[derive(Debug, Clone)]
pub struct Rule {
    pub selector: Selector,
    pub declarations: Vec<Declaration>,
    /// Position in the stylesheet, used as the cascade tiebreaker.
    pub source_order: u32,
}

/// A single `name: value` declaration (shorthands already expanded).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

/// A descendant-combinator chain of selector parts, subject last.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub parts: Vec<SelectorPart>,
    pub pseudo: Option<PseudoElement>,
}

/// One compound step: optional tag plus any number of ids/classes.
/// All-empty means the universal selector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorPart {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

/// (ids, classes, types), compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

// ─────────────────────────────────────────────────────────────────────────────
// Stylesheet Parsing
// ─────────────────────────────────────────────────────────────────────────────

impl Stylesheet {
    /// Parse a skin stylesheet. Never fails; invalid fragments are skipped.
    pub fn parse(css: &str) -> Self {
        let css = strip_comments(css);
        let mut rules = Vec::new();
        let mut source_order = 0u32;
        let bytes = css.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            // Skip whitespace and stray terminators between rules.
            if bytes[i].is_ascii_whitespace() || bytes[i] == b'}' || bytes[i] == b';' {
                i += 1;
                continue;
            }

            if bytes[i] == b'@' {
                i = skip_at_rule(&css, i);
                continue;
            }

            let Some(open) = find_unquoted(&css, i, b'{') else {
                break;
            };
            let selector_text = &css[i..open];
            let Some(close) = find_unquoted(&css, open + 1, b'}') else {
                break;
            };
            let block = &css[open + 1..close];
            i = close + 1;

            let declarations = parse_declaration_block(block);
            if declarations.is_empty() {
                continue;
            }

            for group in split_top_level(selector_text, ',') {
                match Selector::parse(group.trim()) {
                    Some(selector) => {
                        rules.push(Rule {
                            selector,
                            declarations: declarations.clone(),
                            source_order,
                        });
                        source_order += 1;
                    }
                    None => {
                        debug!("Skipping unsupported selector '{}'", group.trim());
                    }
                }
            }
        }

        Stylesheet { rules }
    }
}

/// Remove `/* ... */` comments. Unterminated comments swallow the rest.
fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Advance past an at-rule starting at `start` (either `@...;` or a full
/// braced block, which may nest).
fn skip_at_rule(css: &str, start: usize) -> usize {
    let bytes = css.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b';' => return i + 1,
            b'{' => {
                let mut depth = 1;
                i += 1;
                while i < bytes.len() && depth > 0 {
                    match bytes[i] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    i += 1;
                }
                return i;
            }
            _ => i += 1,
        }
    }
    i
}

/// Find the next occurrence of `target` outside quotes, from `from`.
fn find_unquoted(css: &str, from: usize, target: u8) -> Option<usize> {
    let bytes = css.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => {
                if b == b'\'' || b == b'"' {
                    quote = Some(b);
                } else if b == target {
                    return Some(i);
                }
            }
        }
        i += 1;
    }
    None
}

/// Split on `sep` at top level: outside quotes and parentheses.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if c == sep && depth == 0 => {
                    parts.push(&text[start..idx]);
                    start = idx + ch.len_utf8();
                }
                _ => {}
            },
        }
    }
    parts.push(&text[start..]);
    parts
}

// ─────────────────────────────────────────────────────────────────────────────
// Declaration Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a declaration block (or an inline `style` attribute value) into
/// expanded declarations.
pub fn parse_declaration_block(block: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for piece in split_top_level(block, ';') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let Some(colon) = piece.find(':') else {
            debug!("Skipping malformed declaration '{}'", piece);
            continue;
        };
        let name = piece[..colon].trim().to_ascii_lowercase();
        let mut value = piece[colon + 1..].trim().to_string();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        let mut important = false;
        if let Some(stripped) = value.strip_suffix("!important") {
            important = true;
            value = stripped.trim_end().to_string();
        }
        expand_declaration(&name, &value, important, &mut declarations);
    }
    declarations
}

/// Expand shorthands into the longhand forms the allow-list knows about.
fn expand_declaration(name: &str, value: &str, important: bool, out: &mut Vec<Declaration>) {
    let push = |out: &mut Vec<Declaration>, name: &str, value: &str| {
        out.push(Declaration {
            name: name.to_string(),
            value: normalize_zero(name, value),
            important,
        });
    };

    match name {
        "margin" | "padding" => {
            if let Some([top, right, bottom, left]) = parse_box_shorthand(value) {
                push(out, &format!("{}-top", name), top);
                push(out, &format!("{}-right", name), right);
                push(out, &format!("{}-bottom", name), bottom);
                push(out, &format!("{}-left", name), left);
            } else {
                push(out, name, value);
            }
        }
        "border" => {
            for side in ["border-top", "border-right", "border-bottom", "border-left"] {
                push(out, side, value);
            }
        }
        "background" => {
            if value.contains("url(") {
                push(out, "background-image", value);
            } else {
                push(out, "background-color", value);
            }
        }
        "list-style" => {
            for token in value.split_whitespace() {
                match token {
                    "inside" | "outside" => push(out, "list-style-position", token),
                    other => push(out, "list-style-type", other),
                }
            }
        }
        _ => push(out, name, value),
    }
}

/// Split a 1–4 value box shorthand into [top, right, bottom, left].
/// Functional values (anything with parentheses) are left unexpanded.
fn parse_box_shorthand(value: &str) -> Option<[&str; 4]> {
    if value.contains('(') {
        return None;
    }
    let tokens: Vec<&str> = value.split_whitespace().collect();
    match tokens.as_slice() {
        [all] => Some([all, all, all, all]),
        [vertical, horizontal] => Some([vertical, horizontal, vertical, horizontal]),
        [top, horizontal, bottom] => Some([top, horizontal, bottom, horizontal]),
        [top, right, bottom, left] => Some([top, right, bottom, left]),
        _ => None,
    }
}

/// Length properties where a bare `0` means `0px`. Normalizing keeps the
/// suppression rules working on a single token form.
fn normalize_zero(name: &str, value: &str) -> String {
    let is_length = is_spacing_property(name)
        || matches!(
            name,
            "text-indent"
                | "letter-spacing"
                | "border-radius"
                | "width"
                | "max-width"
                | "min-width"
                | "height"
        );
    if is_length && value == "0" {
        "0px".to_string()
    } else {
        value.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selector Parsing & Matching
// ─────────────────────────────────────────────────────────────────────────────

impl Selector {
    /// Parse a single selector (no commas). Returns `None` for selectors
    /// outside the dialect (child/sibling combinators, pseudo-classes).
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() || text.contains('>') || text.contains('+') || text.contains('~') {
            return None;
        }

        let mut pseudo = None;
        let mut parts = Vec::new();
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let last_index = tokens.len().checked_sub(1)?;

        for (index, token) in tokens.iter().enumerate() {
            let mut token = *token;
            if let Some((rest, found)) = strip_pseudo(token) {
                // Generated-content suffixes are only meaningful on the
                // subject compound.
                if index != last_index {
                    return None;
                }
                pseudo = Some(found);
                token = rest;
            }
            parts.push(SelectorPart::parse(token)?);
        }

        Some(Selector { parts, pseudo })
    }

    /// Selector weight: (ids, classes, types).
    pub fn specificity(&self) -> Specificity {
        let mut ids = 0;
        let mut classes = 0;
        let mut types = 0;
        for part in &self.parts {
            if part.id.is_some() {
                ids += 1;
            }
            classes += part.classes.len() as u32;
            if part.tag.is_some() {
                types += 1;
            }
        }
        if self.pseudo.is_some() {
            types += 1;
        }
        Specificity(ids, classes, types)
    }

    /// Match against an element given its ancestor chain (root first).
    pub fn matches(&self, tree: &DomTree, ancestors: &[NodeId], node: NodeId) -> bool {
        let Some(element) = tree.element(node) else {
            return false;
        };
        let Some((subject, rest)) = self.parts.split_last() else {
            return false;
        };
        if !subject.matches(element) {
            return false;
        }

        // Remaining parts must match ancestors in order, nearest-first scan.
        let mut ancestor_iter = ancestors.iter().rev();
        for part in rest.iter().rev() {
            let mut found = false;
            for ancestor in ancestor_iter.by_ref() {
                if tree.element(*ancestor).map_or(false, |e| part.matches(e)) {
                    found = true;
                    break;
                }
            }
            if !found {
                return false;
            }
        }
        true
    }
}

/// Strip a trailing pseudo-element suffix, returning the remaining compound.
fn strip_pseudo(token: &str) -> Option<(&str, PseudoElement)> {
    for (suffix, pseudo) in [
        ("::before", PseudoElement::Before),
        ("::after", PseudoElement::After),
        (":before", PseudoElement::Before),
        (":after", PseudoElement::After),
    ] {
        if let Some(rest) = token.strip_suffix(suffix) {
            return Some((rest, pseudo));
        }
    }
    None
}

impl SelectorPart {
    /// Parse one compound step: `tag`, `#id`, `.class`, `*`, or combinations.
    fn parse(token: &str) -> Option<Self> {
        if token.is_empty() {
            // A bare pseudo suffix (`::before` alone) leaves an empty
            // compound, which acts as universal.
            return Some(SelectorPart::default());
        }
        if token == "*" {
            return Some(SelectorPart::default());
        }

        let mut part = SelectorPart::default();
        let mut rest = token;
        // Leading tag name, if any.
        if !rest.starts_with('#') && !rest.starts_with('.') {
            let end = rest.find(['#', '.']).unwrap_or(rest.len());
            let tag = &rest[..end];
            if tag.contains(':') || tag.contains('[') {
                return None;
            }
            part.tag = Some(tag.to_ascii_lowercase());
            rest = &rest[end..];
        }
        while !rest.is_empty() {
            let kind = rest.as_bytes()[0];
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() || name.contains(':') || name.contains('[') {
                return None;
            }
            match kind {
                b'#' => part.id = Some(name.to_string()),
                b'.' => part.classes.push(name.to_string()),
                _ => return None,
            }
            rest = &body[end..];
        }
        Some(part)
    }

    /// Match one compound against an element.
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = element.attr("class").unwrap_or("");
            let classes: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
                return false;
            }
        }
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
