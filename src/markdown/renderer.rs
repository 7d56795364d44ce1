//! Markdown to HTML rendering using comrak
//!
//! The preview pipeline starts here: the article source is rendered to an
//! HTML fragment, which the DOM layer then parses into the preview tree.
//! Rendering is pure and deterministic: the same source always produces
//! the same fragment.

use comrak::{markdown_to_html, Options};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown dialect switches.
///
/// The defaults match what the paste target understands: GitHub Flavored
/// Markdown extensions on, raw HTML passed through for hand-tuned snippets.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// GFM tables
    pub tables: bool,
    /// Strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Autolink bare URLs and emails
    pub autolink: bool,
    /// Task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Footnotes ([^1])
    pub footnotes: bool,
    /// Pass raw HTML through instead of escaping it
    pub raw_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            raw_html: true,
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;

        options.render.unsafe_ = self.raw_html;
        options.render.escape = !self.raw_html;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Render markdown to an HTML fragment with the default dialect.
pub fn render_markdown(markdown: &str) -> String {
    render_markdown_with_options(markdown, &MarkdownOptions::default())
}

/// Render markdown to an HTML fragment.
pub fn render_markdown_with_options(markdown: &str, options: &MarkdownOptions) -> String {
    markdown_to_html(markdown, &options.to_comrak_options())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Core Rendering
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading() {
        assert_eq!(render_markdown("# Title"), "<h1>Title</h1>\n");
    }

    #[test]
    fn test_paragraph_with_emphasis() {
        assert_eq!(
            render_markdown("Hello **world**"),
            "<p>Hello <strong>world</strong></p>\n"
        );
    }

    #[test]
    fn test_code_fence() {
        let html = render_markdown("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre><code"));
        assert!(html.contains("fn main() {}"));
    }

    #[test]
    fn test_deterministic() {
        let source = "# A\n\nSome *text* with a [link](https://example.com).\n";
        assert_eq!(render_markdown(source), render_markdown(source));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // GFM Extensions
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_strikethrough() {
        assert_eq!(render_markdown("~~gone~~"), "<p><del>gone</del></p>\n");
    }

    #[test]
    fn test_table() {
        let html = render_markdown("| a | b |\n| - | - |\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>a</th>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn test_task_list() {
        let html = render_markdown("- [x] done\n- [ ] pending");
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("checked"));
    }

    #[test]
    fn test_autolink() {
        let html = render_markdown("see https://example.com now");
        assert!(html.contains("<a href=\"https://example.com\">"));
    }

    #[test]
    fn test_footnotes() {
        let html = render_markdown("text[^1]\n\n[^1]: the note");
        assert!(html.contains("footnote-ref"));
        assert!(html.contains("the note"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Raw HTML
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_raw_html_passthrough() {
        let html = render_markdown("<center>hi</center>");
        assert!(html.contains("<center>hi</center>"));
    }

    #[test]
    fn test_raw_html_escaped_when_disabled() {
        let options = MarkdownOptions {
            raw_html: false,
            ..MarkdownOptions::default()
        };
        let html = render_markdown_with_options("<center>hi</center>", &options);
        assert!(!html.contains("<center>"));
        assert!(html.contains("&lt;center&gt;"));
    }

    #[test]
    fn test_extensions_can_be_disabled() {
        let options = MarkdownOptions {
            strikethrough: false,
            ..MarkdownOptions::default()
        };
        let html = render_markdown_with_options("~~kept~~", &options);
        assert!(html.contains("~~kept~~"));
        assert!(!html.contains("<del>"));
    }
}
