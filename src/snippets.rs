//! Reusable copy snippets
//!
//! Short blocks of markdown the user inserts over and over: follow prompts,
//! disclaimers, recommended-reading lists. The library ships four stock
//! snippets and persists the user's own through user data. The editor's
//! context menu offers the first few for one-click insertion; the manage
//! dialog edits the full list.

use serde::{Deserialize, Serialize};

/// Fallback category for snippets saved without one.
pub const DEFAULT_CATEGORY: &str = "通用";

/// How many snippets the editor context menu lists.
pub const CONTEXT_MENU_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub category: String,
    pub content: String,
}

/// The snippets shipped with the app, seeded on first run.
pub fn default_snippets() -> Vec<Snippet> {
    let stock = [
        (
            "s_01",
            "文末引导关注",
            "引导类",
            "> 如果觉得文章对你有帮助，欢迎点赞、在看、关注！\n> 你的支持是我持续更新的动力。",
        ),
        (
            "s_02",
            "免责声明",
            "声明类",
            "**免责声明：**\n本文内容仅供参考，不构成任何投资建议。如需转载请联系后台授权。",
        ),
        (
            "s_03",
            "往期推荐",
            "引导类",
            "### 📚 往期推荐\n\n- [文章标题1](#)\n- [文章标题2](#)\n- [文章标题3](#)",
        ),
        (
            "s_04",
            "分割线组合",
            "装饰类",
            "---\n\n<center>✦  +  +  ✦</center>\n\n---",
        ),
    ];
    stock
        .into_iter()
        .map(|(id, title, category, content)| Snippet {
            id: id.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            content: content.to_string(),
        })
        .collect()
}

/// The user's snippet list. Unlike skins there is no built-in/custom split:
/// stock snippets are ordinary entries the user may edit or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetLibrary {
    snippets: Vec<Snippet>,
}

impl Default for SnippetLibrary {
    fn default() -> Self {
        Self {
            snippets: default_snippets(),
        }
    }
}

impl SnippetLibrary {
    /// Restore from persisted user data, keeping the stored list verbatim
    /// (a user who deleted every snippet stays at zero).
    pub fn from_stored(snippets: Vec<Snippet>) -> Self {
        Self { snippets }
    }

    pub fn all(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// The leading snippets offered in the editor's context menu.
    pub fn context_menu_entries(&self) -> &[Snippet] {
        let end = self.snippets.len().min(CONTEXT_MENU_LIMIT);
        &self.snippets[..end]
    }

    /// Distinct categories in first-seen order, for the filter dropdown.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for snippet in &self.snippets {
            if !seen.contains(&snippet.category.as_str()) {
                seen.push(&snippet.category);
            }
        }
        seen
    }

    /// Snippets in one category, or all of them when `category` is `None`.
    pub fn filtered(&self, category: Option<&str>) -> Vec<&Snippet> {
        self.snippets
            .iter()
            .filter(|s| category.is_none_or(|c| s.category == c))
            .collect()
    }

    /// Append a new snippet; the id is the creation timestamp. An empty
    /// category falls back to [`DEFAULT_CATEGORY`].
    pub fn add(&mut self, title: &str, category: &str, content: &str, now_ms: u64) -> &Snippet {
        let category = if category.trim().is_empty() {
            DEFAULT_CATEGORY
        } else {
            category
        };
        self.snippets.push(Snippet {
            id: now_ms.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            content: content.to_string(),
        });
        // Just pushed, so the list is non-empty.
        &self.snippets[self.snippets.len() - 1]
    }

    pub fn update(&mut self, id: &str, title: &str, category: &str, content: &str) -> bool {
        match self.snippets.iter_mut().find(|s| s.id == id) {
            Some(snippet) => {
                snippet.title = title.to_string();
                snippet.category = if category.trim().is_empty() {
                    DEFAULT_CATEGORY.to_string()
                } else {
                    category.to_string()
                };
                snippet.content = content.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.snippets.len();
        self.snippets.retain(|s| s.id != id);
        self.snippets.len() < before
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_snippets() {
        let library = SnippetLibrary::default();
        let titles: Vec<&str> = library.all().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["文末引导关注", "免责声明", "往期推荐", "分割线组合"]);
        assert!(library.get("s_02").unwrap().content.starts_with("**免责声明：**"));
    }

    #[test]
    fn test_context_menu_lists_at_most_five() {
        let mut library = SnippetLibrary::default();
        for i in 0..4 {
            library.add("extra", "通用", "text", i);
        }
        assert_eq!(library.all().len(), 8);
        assert_eq!(library.context_menu_entries().len(), CONTEXT_MENU_LIMIT);
        assert_eq!(library.context_menu_entries()[0].id, "s_01");
    }

    #[test]
    fn test_context_menu_with_short_list() {
        let library = SnippetLibrary::from_stored(vec![]);
        assert!(library.context_menu_entries().is_empty());
    }

    #[test]
    fn test_categories_are_deduplicated_in_order() {
        let library = SnippetLibrary::default();
        assert_eq!(library.categories(), ["引导类", "声明类", "装饰类"]);
    }

    #[test]
    fn test_category_filter() {
        let library = SnippetLibrary::default();
        let guides = library.filtered(Some("引导类"));
        assert_eq!(guides.len(), 2);
        assert_eq!(library.filtered(None).len(), 4);
        assert!(library.filtered(Some("不存在")).is_empty());
    }

    #[test]
    fn test_add_defaults_blank_category() {
        let mut library = SnippetLibrary::from_stored(vec![]);
        let snippet = library.add("标题", "  ", "内容", 1700000000123);
        assert_eq!(snippet.id, "1700000000123");
        assert_eq!(snippet.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_update_and_remove() {
        let mut library = SnippetLibrary::default();
        assert!(library.update("s_01", "新标题", "新分类", "新内容"));
        let snippet = library.get("s_01").unwrap();
        assert_eq!(snippet.title, "新标题");
        assert_eq!(snippet.category, "新分类");

        assert!(library.remove("s_01"));
        assert!(!library.remove("s_01"));
        assert_eq!(library.all().len(), 3);
    }

    #[test]
    fn test_stored_list_survives_roundtrip() {
        let mut library = SnippetLibrary::default();
        library.remove("s_03");
        let restored = SnippetLibrary::from_stored(library.all().to_vec());
        assert_eq!(restored.all().len(), 3);
        assert!(restored.get("s_03").is_none());
    }
}
