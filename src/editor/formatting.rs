//! Selection formatting commands
//!
//! The floating toolbar and the keyboard shortcuts both funnel through
//! [`apply_format`]: wrap the selected text in the command's markers and
//! keep the same text selected afterwards, shifted past the opening
//! marker. An empty selection inserts the marker pair and parks the
//! caret between the markers, ready for typing.

use crate::string_utils::{ceil_char_boundary, floor_char_boundary};

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// A formatting command from the floating selection toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    /// **text**
    Bold,
    /// *text*
    Italic,
    /// ~~text~~
    Strikethrough,
    /// `text`
    InlineCode,
    /// > text
    Quote,
}

impl FormatCommand {
    /// Opening and closing markers.
    fn affixes(&self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("**", "**"),
            Self::Italic => ("*", "*"),
            Self::Strikethrough => ("~~", "~~"),
            Self::InlineCode => ("`", "`"),
            Self::Quote => ("> ", ""),
        }
    }

    /// Toolbar button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Strikethrough => "S",
            Self::InlineCode => "</>",
            Self::Quote => "❝",
        }
    }

    /// Tooltip text, with the shortcut where one is bound.
    pub fn tooltip(&self) -> &'static str {
        match self {
            Self::Bold => "加粗 (Ctrl+B)",
            Self::Italic => "斜体 (Ctrl+I)",
            Self::Strikethrough => "删除线",
            Self::InlineCode => "行内代码",
            Self::Quote => "引用",
        }
    }

    /// All commands in toolbar order.
    pub fn all() -> [FormatCommand; 5] {
        [
            Self::Bold,
            Self::Italic,
            Self::Strikethrough,
            Self::InlineCode,
            Self::Quote,
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application
// ─────────────────────────────────────────────────────────────────────────────

/// Result of applying a formatting command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// The full document text after the edit
    pub text: String,
    /// Byte range that should be selected afterwards: the original
    /// selection, shifted past the opening marker
    pub selection: (usize, usize),
}

/// Wrap the selected byte range in the command's markers.
///
/// An empty selection still inserts the marker pair, with the returned
/// (collapsed) selection sitting between the markers. Out-of-range or
/// mid-character indices are snapped to the nearest valid boundaries
/// rather than rejected.
pub fn apply_format(text: &str, selection: (usize, usize), command: FormatCommand) -> FormatResult {
    let (start, end) = selection;
    let start = floor_char_boundary(text, start.min(text.len()));
    let end = ceil_char_boundary(text, end.min(text.len()));
    let (start, end) = if start > end { (end, start) } else { (start, end) };

    let (prefix, suffix) = command.affixes();
    let new_text = format!(
        "{}{}{}{}{}",
        &text[..start],
        prefix,
        &text[start..end],
        suffix,
        &text[end..]
    );

    FormatResult {
        text: new_text,
        selection: (start + prefix.len(), end + prefix.len()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Wrapping Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_wraps_selection() {
        let result = apply_format("Hello world", (0, 5), FormatCommand::Bold);
        assert_eq!(result.text, "**Hello** world");
        assert_eq!(result.selection, (2, 7));
    }

    #[test]
    fn test_italic_wraps_selection() {
        let result = apply_format("Hello world", (6, 11), FormatCommand::Italic);
        assert_eq!(result.text, "Hello *world*");
        assert_eq!(result.selection, (7, 12));
    }

    #[test]
    fn test_strikethrough() {
        let result = apply_format("old text", (0, 3), FormatCommand::Strikethrough);
        assert_eq!(result.text, "~~old~~ text");
    }

    #[test]
    fn test_inline_code() {
        let result = apply_format("use apply_format", (4, 16), FormatCommand::InlineCode);
        assert_eq!(result.text, "use `apply_format`");
    }

    #[test]
    fn test_quote_is_prefix_only() {
        let result = apply_format("a wise line", (0, 11), FormatCommand::Quote);
        assert_eq!(result.text, "> a wise line");
        assert_eq!(result.selection, (2, 13));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection Handling
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_selection_inserts_marker_pair() {
        let result = apply_format("Hello", (3, 3), FormatCommand::Bold);
        assert_eq!(result.text, "Hel****lo");
        assert_eq!(result.selection, (5, 5));
    }

    #[test]
    fn test_empty_selection_quote_inserts_prefix() {
        let result = apply_format("line", (0, 0), FormatCommand::Quote);
        assert_eq!(result.text, "> line");
        assert_eq!(result.selection, (2, 2));
    }

    #[test]
    fn test_reversed_selection_normalized() {
        let result = apply_format("Hello world", (5, 0), FormatCommand::Bold);
        assert_eq!(result.text, "**Hello** world");
    }

    #[test]
    fn test_out_of_range_selection_clamped() {
        let result = apply_format("abc", (1, 99), FormatCommand::Italic);
        assert_eq!(result.text, "a*bc*");
    }

    #[test]
    fn test_cjk_selection() {
        // 每个汉字三个字节
        let text = "你好世界";
        let result = apply_format(text, (0, 6), FormatCommand::Bold);
        assert_eq!(result.text, "**你好**世界");
        assert_eq!(result.selection, (2, 8));
    }

    #[test]
    fn test_mid_character_indices_snapped() {
        let text = "a你b";
        // Byte 2 falls inside 你; floor/ceil must not panic or split it.
        for start in 0..=text.len() {
            for end in 0..=text.len() {
                let _ = apply_format(text, (start, end), FormatCommand::Bold);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Command Metadata
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_all_commands_have_labels() {
        for command in FormatCommand::all() {
            assert!(!command.label().is_empty());
            assert!(!command.tooltip().is_empty());
        }
    }
}
