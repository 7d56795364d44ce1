//! Word counting for the status bar
//!
//! Counts words the way the WeChat publishing backend does: every CJK
//! character is one word, and every contiguous ASCII word run is one word.
//! Heading lines are tallied separately from body lines so the status bar
//! can show 标题/正文/总计, and the platform's article length limits are
//! exposed as predicates.

use std::sync::OnceLock;

use regex::Regex;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Hard word limit the publishing backend enforces per article.
pub const WORD_LIMIT: usize = 20_000;

/// Lower bound of the platform's recommended article length.
pub const RECOMMENDED_MIN_WORDS: usize = 300;

fn cjk_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\u{4e00}-\u{9fa5}]").expect("valid CJK pattern"))
}

fn ascii_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+").expect("valid word pattern"))
}

fn heading_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#+\s*").expect("valid heading pattern"))
}

fn decoration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Markdown punctuation that should not count as content: emphasis and
    // quote markers, list dashes, backticks, link brackets, and spaces.
    RE.get_or_init(|| Regex::new(r"[*> `\[\]()\-]").expect("valid decoration pattern"))
}

// ─────────────────────────────────────────────────────────────────────────────
// WordCount
// ─────────────────────────────────────────────────────────────────────────────

/// Word counts for one markdown document, split by heading and body lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordCount {
    /// Words on heading lines (`# ...`)
    pub title: usize,
    /// Words on all other non-empty lines
    pub body: usize,
}

impl WordCount {
    pub fn total(&self) -> usize {
        self.title + self.body
    }

    /// Over the backend's hard per-article limit.
    pub fn over_limit(&self) -> bool {
        self.total() > WORD_LIMIT
    }

    /// Within the platform's recommended length band.
    pub fn within_recommended(&self) -> bool {
        (RECOMMENDED_MIN_WORDS..=WORD_LIMIT).contains(&self.total())
    }

    /// Status bar text: `标题: 12 | 正文: 840 | 总计: 852`.
    pub fn format_status(&self) -> String {
        format!(
            "标题: {} | 正文: {} | 总计: {}",
            self.title,
            self.body,
            self.total()
        )
    }
}

/// Count words in a markdown document.
///
/// Lines are trimmed and counted independently. Heading lines lose their
/// `#` prefix; body lines lose markdown decoration characters first. What
/// remains is counted as CJK characters plus ASCII word runs.
pub fn count_words(markdown: &str) -> WordCount {
    let mut count = WordCount::default();

    for line in markdown.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            let text = heading_prefix_re().replace(line, "");
            count.title += count_segment(&text);
        } else {
            let text = decoration_re().replace_all(line, "");
            count.body += count_segment(&text);
        }
    }

    count
}

/// CJK characters count individually; the rest counts as ASCII word runs.
fn count_segment(text: &str) -> usize {
    let cjk = cjk_re().find_iter(text).count();
    let without_cjk = cjk_re().replace_all(text, "");
    let ascii_words = ascii_word_re().find_iter(&without_cjk).count();
    cjk + ascii_words
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Counting Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_document() {
        let count = count_words("");
        assert_eq!(count.title, 0);
        assert_eq!(count.body, 0);
        assert_eq!(count.total(), 0);
    }

    #[test]
    fn test_cjk_characters_count_individually() {
        let count = count_words("微信公众号编辑器");
        assert_eq!(count.body, 8);
    }

    #[test]
    fn test_ascii_word_runs_count_once() {
        // Body lines lose their spaces with the other decorations, so
        // adjacent ASCII words merge into one run.
        let count = count_words("hello world");
        assert_eq!(count.body, 1);
    }

    #[test]
    fn test_heading_words_counted_as_title() {
        let count = count_words("# 文章标题");
        assert_eq!(count.title, 4);
        assert_eq!(count.body, 0);
    }

    #[test]
    fn test_heading_keeps_spaces_between_ascii_words() {
        // Heading lines only strip the # prefix.
        let count = count_words("## hello world");
        assert_eq!(count.title, 2);
    }

    #[test]
    fn test_mixed_cjk_and_ascii() {
        let count = count_words("使用 Rust 编写");
        // 4 CJK characters + the "Rust" run.
        assert_eq!(count.body, 5);
    }

    #[test]
    fn test_decorations_ignored() {
        let count = count_words("- **重点** `code` [链接](url)");
        // 重点 + 链接 = 4 CJK; "code" and "url" merge into one ASCII run.
        assert_eq!(count.body, 5);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let count = count_words("你好\n\n   \n世界");
        assert_eq!(count.body, 4);
    }

    #[test]
    fn test_title_and_body_split() {
        let markdown = "# 标题\n\n正文第一段。\n\n## 小节\n\n更多正文。";
        let count = count_words(markdown);
        assert_eq!(count.title, 4);
        assert_eq!(count.body, 9);
        assert_eq!(count.total(), 13);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Limit Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_over_limit() {
        let count = WordCount {
            title: 0,
            body: WORD_LIMIT + 1,
        };
        assert!(count.over_limit());
        assert!(!count.within_recommended());
    }

    #[test]
    fn test_within_recommended_band() {
        let count = WordCount {
            title: 10,
            body: 400,
        };
        assert!(!count.over_limit());
        assert!(count.within_recommended());
    }

    #[test]
    fn test_short_article_not_recommended() {
        let count = WordCount { title: 2, body: 50 };
        assert!(!count.within_recommended());
    }

    #[test]
    fn test_boundary_values() {
        let at_min = WordCount {
            title: 0,
            body: RECOMMENDED_MIN_WORDS,
        };
        assert!(at_min.within_recommended());

        let at_limit = WordCount {
            title: 0,
            body: WORD_LIMIT,
        };
        assert!(at_limit.within_recommended());
        assert!(!at_limit.over_limit());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Formatting Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_format_status() {
        let count = WordCount {
            title: 12,
            body: 840,
        };
        assert_eq!(count.format_status(), "标题: 12 | 正文: 840 | 总计: 852");
    }
}
