//! Lightweight markdown lint for the editor overlay
//!
//! Two checks that catch the mistakes that actually mangle a published
//! article: an unclosed code fence (which swallows the rest of the
//! document) and an odd number of `**` markers on a line (which leaks
//! asterisks into the rendered output). Lines inside a closed code fence
//! are exempt from the emphasis check.

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// One problem found in the markdown source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

impl SyntaxIssue {
    fn new(line: usize, message: &str) -> Self {
        Self {
            line,
            message: message.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Checks
// ─────────────────────────────────────────────────────────────────────────────

/// Scan the document for fence and emphasis problems.
///
/// An unclosed fence is reported at its opening line, before any emphasis
/// issues. The scan is line-based and cheap enough to run on every edit.
pub fn check_syntax(markdown: &str) -> Vec<SyntaxIssue> {
    let mut fence_open: Option<usize> = None;
    let mut emphasis_issues = Vec::new();

    for (i, line) in markdown.lines().enumerate() {
        if line.trim().starts_with("```") {
            fence_open = match fence_open {
                None => Some(i),
                Some(_) => None,
            };
            continue;
        }

        // Code is allowed to contain loose asterisks.
        if fence_open.is_some() {
            continue;
        }

        if count_double_asterisks(line) % 2 != 0 {
            emphasis_issues.push(SyntaxIssue::new(i + 1, "未闭合的加粗标记 (**)"));
        }
    }

    let mut issues = Vec::new();
    if let Some(open_line) = fence_open {
        issues.push(SyntaxIssue::new(open_line + 1, "未闭合的代码块 (```)"));
    }
    issues.extend(emphasis_issues);
    issues
}

/// Non-overlapping `**` occurrences, so `***` counts one and `****` two.
fn count_double_asterisks(line: &str) -> usize {
    line.matches("**").count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Fence Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_clean_document() {
        assert!(check_syntax("# Title\n\nHello **world**.\n").is_empty());
    }

    #[test]
    fn test_unclosed_fence_reported_at_opening_line() {
        let issues = check_syntax("text\n```rust\nfn main() {}\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].message, "未闭合的代码块 (```)");
    }

    #[test]
    fn test_closed_fence_is_fine() {
        let issues = check_syntax("```\ncode\n```\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_second_fence_pair_unclosed() {
        let issues = check_syntax("```\na\n```\ntext\n```\nb\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 5);
    }

    #[test]
    fn test_indented_fence_delimiter_detected() {
        let issues = check_syntax("  ```\ncode\n");
        assert_eq!(issues[0].line, 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Emphasis Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_odd_bold_markers_flagged() {
        let issues = check_syntax("this is **broken\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
        assert_eq!(issues[0].message, "未闭合的加粗标记 (**)");
    }

    #[test]
    fn test_balanced_bold_markers_pass() {
        assert!(check_syntax("**a** and **b**\n").is_empty());
    }

    #[test]
    fn test_triple_asterisk_counts_one_marker() {
        // "***x" contains a single non-overlapping ** occurrence.
        let issues = check_syntax("***x\n");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_bold_check_skips_code_block_lines() {
        let issues = check_syntax("```\nlet x = a ** b; // ** in code\n```\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_bold_check_resumes_after_fence() {
        let issues = check_syntax("```\n**\n```\nafter **oops\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 4);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ordering Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_fence_issue_listed_before_emphasis_issues() {
        let issues = check_syntax("**broken\n```\ncode\n");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].message, "未闭合的代码块 (```)");
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[1].line, 1);
    }

    #[test]
    fn test_multiple_emphasis_issues_in_line_order() {
        let issues = check_syntax("**a\nfine\n**b\n");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line, 1);
        assert_eq!(issues[1].line, 3);
    }
}
